//! Field values carried by header records

use serde::{Deserialize, Serialize};

/// One value in a header record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// MQLONG scalar
    Integer(i32),
    /// Character field, trimmed of its pad
    Text(String),
    /// Binary field such as a message id, trimmed of trailing NULs
    Bytes(Vec<u8>),
    /// Name/value trailer of an MQRFH
    NameValues(NameValueMap),
    /// Folder list of an MQRFH2
    List(Vec<String>),
}

impl FieldValue {
    /// Kind name used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Integer(_) => "integer",
            FieldValue::Text(_) => "text",
            FieldValue::Bytes(_) => "bytes",
            FieldValue::NameValues(_) => "name/value map",
            FieldValue::List(_) => "string list",
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_name_values(&self) -> Option<&NameValueMap> {
        match self {
            FieldValue::NameValues(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Bytes(value)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        FieldValue::Bytes(value.to_vec())
    }
}

impl From<NameValueMap> for FieldValue {
    fn from(map: NameValueMap) -> Self {
        FieldValue::NameValues(map)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

/// Value side of one name in a [`NameValueMap`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameValue {
    Single(String),
    /// The name occurred more than once, values in wire order
    Multiple(Vec<String>),
}

impl NameValue {
    pub fn values(&self) -> &[String] {
        match self {
            NameValue::Single(value) => std::slice::from_ref(value),
            NameValue::Multiple(values) => values,
        }
    }
}

/// Insertion-ordered name → value(s) mapping
///
/// `insert` replaces, `append` accumulates: appending an existing name turns
/// its value into [`NameValue::Multiple`], which is exactly how a decoded
/// trailer with repeated names is represented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameValueMap {
    entries: Vec<(String, NameValue)>,
}

impl NameValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, replacing any previous value in place
    pub fn insert(&mut self, name: impl Into<String>, value: NameValue) -> Option<NameValue> {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Adds one occurrence of `name`
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => match slot {
                NameValue::Single(first) => {
                    let first = std::mem::take(first);
                    *slot = NameValue::Multiple(vec![first, value]);
                }
                NameValue::Multiple(values) => values.push(value),
            },
            None => self.entries.push((name, NameValue::Single(value))),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&NameValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NameValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Every (name, value) occurrence, list values expanded in order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(name, value)| {
            value
                .values()
                .iter()
                .map(move |single| (name.as_str(), single.as_str()))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for NameValueMap {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut map = NameValueMap::new();
        for (name, value) in iter {
            map.append(name, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_coalesces_repeated_names() {
        let map: NameValueMap = [("colour", "red"), ("size", "9"), ("colour", "blue")]
            .into_iter()
            .collect();

        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get("colour"),
            Some(&NameValue::Multiple(vec!["red".into(), "blue".into()]))
        );
        assert_eq!(map.get("size"), Some(&NameValue::Single("9".into())));
        assert_eq!(map.get("weight"), None);
    }

    #[test]
    fn test_pairs_expand_lists_in_order() {
        let map = NameValueMap::new()
            .with("a", "1")
            .with("b", "x")
            .with("a", "2");
        let pairs: Vec<_> = map.pairs().collect();
        assert_eq!(pairs, vec![("a", "1"), ("a", "2"), ("b", "x")]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = NameValueMap::new().with("first", "1").with("second", "2");
        let previous = map.insert("first", NameValue::Single("one".into()));
        assert_eq!(previous, Some(NameValue::Single("1".into())));
        let names: Vec<_> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(FieldValue::from(7).as_integer(), Some(7));
        assert_eq!(FieldValue::from("q").as_text(), Some("q"));
        assert_eq!(FieldValue::from(vec![1u8, 2]).as_bytes(), Some(&[1u8, 2][..]));
        assert_eq!(FieldValue::from("q").as_integer(), None);
        assert_eq!(FieldValue::from(3).kind_name(), "integer");
    }

    proptest::proptest! {
        #[test]
        fn prop_pairs_rebuild_same_map(
            pairs in proptest::collection::vec(("[a-d]", "[a-z]{0,6}"), 0..20)
        ) {
            let map: NameValueMap = pairs.iter().cloned().collect();
            let rebuilt: NameValueMap = map.pairs().collect();
            proptest::prop_assert_eq!(rebuilt, map);
        }
    }
}
