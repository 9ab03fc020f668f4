//! Generic header record: a tag plus ordered fields

use super::format::FormatMarker;
use super::tag::{HeaderTag, HeaderType};
use super::value::FieldValue;
use serde::{Deserialize, Serialize};

/// Name of the field every chainable header uses for the next format
pub const FORMAT_FIELD: &str = "format";

/// Insertion-ordered field name → value mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Sets a field, keeping its original position when it already exists
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let position = self.entries.iter().position(|(existing, _)| existing == name)?;
        Some(self.entries.remove(position).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<FieldValue>> FromIterator<(N, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut fields = FieldMap::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

/// One structure of a header chain in generic form
///
/// Control fields (struct id, version, inline length) never appear in
/// `fields`; the codec owns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRecord {
    tag: HeaderTag,
    fields: FieldMap,
}

/// The default record is an empty message descriptor
impl Default for HeaderRecord {
    fn default() -> Self {
        HeaderRecord::new(HeaderType::MessageDescriptor)
    }
}

impl HeaderRecord {
    pub fn new(tag: impl Into<HeaderTag>) -> Self {
        Self {
            tag: tag.into(),
            fields: FieldMap::new(),
        }
    }

    pub fn from_parts(tag: impl Into<HeaderTag>, fields: FieldMap) -> Self {
        Self {
            tag: tag.into(),
            fields,
        }
    }

    /// Builder-style field setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name, value);
        self
    }

    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(name, value)
    }

    pub fn tag(&self) -> &HeaderTag {
        &self.tag
    }

    pub fn header_type(&self) -> Option<HeaderType> {
        self.tag.header_type()
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldMap {
        &mut self.fields
    }

    pub fn into_parts(self) -> (HeaderTag, FieldMap) {
        (self.tag, self.fields)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn integer(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(FieldValue::as_integer)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// The `format` field as a marker; absent or blank yields `None`
    pub fn format(&self) -> Option<FormatMarker> {
        let marker = FormatMarker::new(self.text(FORMAT_FIELD)?);
        (!marker.is_blank()).then_some(marker)
    }

    /// Stores the marker as text; bytes that are not UTF-8 are replaced
    pub fn set_format(&mut self, marker: FormatMarker) {
        self.fields.insert(FORMAT_FIELD, marker.to_string());
    }
}
