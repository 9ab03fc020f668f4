//! # Header Schemas
//!
//! ## Purpose
//!
//! Describes the binary layout of every MQ structure the codec handles: the
//! ordered field list with each field's kind and width, the default template,
//! the format marker that announces the structure inside a chain, and whether
//! the structure declares its own length inline.
//!
//! ## Field Roles
//!
//! ```text
//! ┌──────────┬─────────┬─────────────┬──────────────┬─────────────────┐
//! │ StrucId  │ Version │ StrucLength │ Value fields │ Trailer (opt.)  │
//! │ verified │ written │ backpatched │ in records   │ in records      │
//! └──────────┴─────────┴─────────────┴──────────────┴─────────────────┘
//! ```
//!
//! Only `Value` fields (and the trailer) are visible in header records; the
//! others are owned by the marshaller.

pub mod definitions;

use crate::error::{CodecError, CodecResult};
use mq_types::{
    FieldValue, FormatMarker, HeaderType, NameValueMap, StrucId, FORMAT_FIELD, FORMAT_MARKER_LEN,
    STRUC_ID_LEN,
};

/// Layout of the variable region at the end of a variable-length structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailerKind {
    /// Opaque bytes up to the declared length
    Raw,
    /// Length-prefixed name/value pairs (MQRFH)
    NameValues,
    /// Length-prefixed, space-padded strings (MQRFH2 folders)
    PaddedStrings,
}

/// Binary kind of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 4-byte signed integer in the configured byte order
    Long,
    /// Space-padded character field
    Chars(usize),
    /// NUL-padded binary field
    Bytes(usize),
    /// Variable region; always the last field
    Trailer(TrailerKind),
}

impl FieldKind {
    /// Bytes occupied in the fixed part of the structure
    pub const fn width(self) -> usize {
        match self {
            FieldKind::Long => 4,
            FieldKind::Chars(width) | FieldKind::Bytes(width) => width,
            FieldKind::Trailer(_) => 0,
        }
    }

    /// Value kind expected by this field, for error messages
    pub const fn expected(self) -> &'static str {
        match self {
            FieldKind::Long => "integer",
            FieldKind::Chars(_) => "text",
            FieldKind::Bytes(_) => "bytes",
            FieldKind::Trailer(TrailerKind::Raw) => "bytes",
            FieldKind::Trailer(TrailerKind::NameValues) => "name/value map",
            FieldKind::Trailer(TrailerKind::PaddedStrings) => "string list",
        }
    }
}

/// Who owns a field's content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Exposed in header records
    Value,
    /// Leading 4-byte id, checked on decode
    StrucId,
    /// Inline structure length, computed on encode
    StrucLength,
    /// Written from the default, never exposed
    Constant,
}

/// Default written when a record omits a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Long(i32),
    Text(&'static str),
    /// Blanks for character fields, NULs for byte fields, empty trailers
    Empty,
}

/// One field of a structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub role: FieldRole,
    pub default: FieldDefault,
}

impl FieldDef {
    pub const fn long(name: &'static str, default: i32) -> Self {
        Self {
            name,
            kind: FieldKind::Long,
            role: FieldRole::Value,
            default: FieldDefault::Long(default),
        }
    }

    pub const fn chars(name: &'static str, width: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Chars(width),
            role: FieldRole::Value,
            default: FieldDefault::Empty,
        }
    }

    pub const fn chars_with(name: &'static str, width: usize, default: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Chars(width),
            role: FieldRole::Value,
            default: FieldDefault::Text(default),
        }
    }

    pub const fn bytes(name: &'static str, width: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Bytes(width),
            role: FieldRole::Value,
            default: FieldDefault::Empty,
        }
    }

    pub const fn trailer(name: &'static str, kind: TrailerKind) -> Self {
        Self {
            name,
            kind: FieldKind::Trailer(kind),
            role: FieldRole::Value,
            default: FieldDefault::Empty,
        }
    }

    pub const fn struc_id(id: &'static str) -> Self {
        Self {
            name: "struc_id",
            kind: FieldKind::Chars(STRUC_ID_LEN),
            role: FieldRole::StrucId,
            default: FieldDefault::Text(id),
        }
    }

    pub const fn version(version: i32) -> Self {
        Self::constant(FieldDef::long("version", version))
    }

    pub const fn struc_length() -> Self {
        Self {
            name: "struc_length",
            kind: FieldKind::Long,
            role: FieldRole::StrucLength,
            default: FieldDefault::Long(0),
        }
    }

    /// Turns any field into a hidden constant
    pub const fn constant(field: FieldDef) -> Self {
        Self {
            role: FieldRole::Constant,
            ..field
        }
    }

    /// Default converted to the value a decode would produce
    pub(crate) fn default_value(&self) -> FieldValue {
        match (self.kind, self.default) {
            (_, FieldDefault::Long(value)) => FieldValue::Integer(value),
            (_, FieldDefault::Text(text)) => FieldValue::Text(text.to_string()),
            (FieldKind::Long, FieldDefault::Empty) => FieldValue::Integer(0),
            (FieldKind::Chars(_), FieldDefault::Empty) => FieldValue::Text(String::new()),
            (FieldKind::Bytes(_), FieldDefault::Empty)
            | (FieldKind::Trailer(TrailerKind::Raw), FieldDefault::Empty) => {
                FieldValue::Bytes(Vec::new())
            }
            (FieldKind::Trailer(TrailerKind::NameValues), FieldDefault::Empty) => {
                FieldValue::NameValues(NameValueMap::new())
            }
            (FieldKind::Trailer(TrailerKind::PaddedStrings), FieldDefault::Empty) => {
                FieldValue::List(Vec::new())
            }
        }
    }
}

/// Static description of one structure, as listed in the schema table
#[derive(Debug, Clone, Copy)]
pub struct SchemaEntry {
    pub header_type: HeaderType,
    /// Vendor structure name, for logs
    pub struct_name: &'static str,
    /// Size of the fixed part; checked against the field widths
    pub fixed_size: usize,
    pub format: Option<FormatMarker>,
    /// The chain always ends after this structure
    pub no_format: bool,
    /// Integer defaults that differ from the field table
    pub overrides: &'static [(&'static str, i32)],
    pub fields: fn() -> Vec<FieldDef>,
}

/// Validated, immutable layout of one structure
#[derive(Debug, Clone)]
pub struct HeaderSchema {
    header_type: HeaderType,
    struct_name: &'static str,
    struc_id: StrucId,
    format: Option<FormatMarker>,
    no_format: bool,
    fields: Vec<FieldDef>,
    offsets: Vec<usize>,
    fixed_size: usize,
    struc_length: Option<usize>,
    trailer: Option<usize>,
}

impl HeaderSchema {
    /// Builds a schema from its table entry, rejecting inconsistent layouts
    pub fn from_entry(entry: &SchemaEntry) -> CodecResult<Self> {
        let name = entry.struct_name;
        let mut fields = (entry.fields)();

        for (field_name, value) in entry.overrides {
            let field = fields
                .iter_mut()
                .find(|field| field.name == *field_name)
                .ok_or_else(|| {
                    CodecError::inconsistent(format!(
                        "{name}: default override for missing field '{field_name}'"
                    ))
                })?;
            if field.kind != FieldKind::Long || field.role != FieldRole::Value {
                return Err(CodecError::inconsistent(format!(
                    "{name}: default override for non-integer field '{field_name}'"
                )));
            }
            field.default = FieldDefault::Long(*value);
        }

        let struc_id = match fields.first() {
            Some(FieldDef {
                role: FieldRole::StrucId,
                default: FieldDefault::Text(id),
                ..
            }) if id.len() == STRUC_ID_LEN => {
                let mut raw = [0u8; STRUC_ID_LEN];
                raw.copy_from_slice(id.as_bytes());
                StrucId::new(raw)
            }
            _ => {
                return Err(CodecError::inconsistent(format!(
                    "{name}: first field must be a 4-byte struct id"
                )))
            }
        };

        let mut offsets = Vec::with_capacity(fields.len());
        let mut offset = 0;
        let mut struc_length = None;
        let mut trailer = None;
        for (index, field) in fields.iter().enumerate() {
            if fields[..index].iter().any(|earlier| earlier.name == field.name) {
                return Err(CodecError::inconsistent(format!(
                    "{name}: duplicate field '{}'",
                    field.name
                )));
            }
            if trailer.is_some() {
                return Err(CodecError::inconsistent(format!(
                    "{name}: field '{}' follows the variable trailer",
                    field.name
                )));
            }
            match (field.role, field.kind) {
                (FieldRole::StrucLength, _) => struc_length = Some(index),
                (_, FieldKind::Trailer(_)) => trailer = Some(index),
                _ => {}
            }
            offsets.push(offset);
            offset += field.kind.width();
        }

        if offset != entry.fixed_size {
            return Err(CodecError::inconsistent(format!(
                "{name}: fields span {offset} bytes, table declares {}",
                entry.fixed_size
            )));
        }
        if trailer.is_some() && struc_length.is_none() {
            return Err(CodecError::inconsistent(format!(
                "{name}: variable trailer without a StrucLength field"
            )));
        }

        Ok(Self {
            header_type: entry.header_type,
            struct_name: entry.struct_name,
            struc_id,
            format: entry.format,
            no_format: entry.no_format,
            fields,
            offsets,
            fixed_size: offset,
            struc_length,
            trailer,
        })
    }

    pub fn header_type(&self) -> HeaderType {
        self.header_type
    }

    pub fn struct_name(&self) -> &'static str {
        self.struct_name
    }

    pub fn struc_id(&self) -> StrucId {
        self.struc_id
    }

    pub fn format(&self) -> Option<FormatMarker> {
        self.format
    }

    pub fn no_format(&self) -> bool {
        self.no_format
    }

    /// Size of everything before the trailer
    pub fn fixed_size(&self) -> usize {
        self.fixed_size
    }

    /// Size is taken from the inline StrucLength rather than the table
    pub fn is_variable_length(&self) -> bool {
        self.trailer.is_some()
    }

    pub(crate) fn struc_length_offset(&self) -> Option<usize> {
        self.struc_length.map(|index| self.offsets[index])
    }

    /// Offset of the 8-byte `format` field naming the next structure
    pub(crate) fn format_offset(&self) -> Option<usize> {
        self.layout()
            .find(|(field, _)| {
                field.role == FieldRole::Value
                    && field.name == FORMAT_FIELD
                    && field.kind == FieldKind::Chars(FORMAT_MARKER_LEN)
            })
            .map(|(_, offset)| offset)
    }

    /// All fields with their offsets, in wire order
    pub fn layout(&self) -> impl Iterator<Item = (&FieldDef, usize)> {
        self.fields.iter().zip(self.offsets.iter().copied())
    }

    /// Fields visible in header records, in wire order
    pub fn value_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields
            .iter()
            .filter(|field| field.role == FieldRole::Value)
    }

    pub fn value_field(&self, name: &str) -> Option<&FieldDef> {
        self.value_fields().find(|field| field.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_fields() -> Vec<FieldDef> {
        vec![
            FieldDef::struc_id("TST "),
            FieldDef::version(1),
            FieldDef::long("flags", 0),
            FieldDef::chars("name", 8),
        ]
    }

    fn entry(fixed_size: usize) -> SchemaEntry {
        SchemaEntry {
            header_type: HeaderType::Ims,
            struct_name: "TEST",
            fixed_size,
            format: Some(FormatMarker::new("TEST")),
            no_format: false,
            overrides: &[],
            fields: small_fields,
        }
    }

    #[test]
    fn test_offsets_follow_widths() {
        let schema = HeaderSchema::from_entry(&entry(20)).unwrap();
        let offsets: Vec<_> = schema.layout().map(|(field, offset)| (field.name, offset)).collect();
        assert_eq!(
            offsets,
            vec![("struc_id", 0), ("version", 4), ("flags", 8), ("name", 12)]
        );
        assert_eq!(schema.struc_id(), StrucId::new(*b"TST "));
        assert!(!schema.is_variable_length());
    }

    #[test]
    fn test_value_fields_hide_control_fields() {
        let schema = HeaderSchema::from_entry(&entry(20)).unwrap();
        let names: Vec<_> = schema.value_fields().map(|field| field.name).collect();
        assert_eq!(names, vec!["flags", "name"]);
        assert!(schema.value_field("version").is_none());
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let error = HeaderSchema::from_entry(&entry(24)).unwrap_err();
        assert!(matches!(error, CodecError::RegistryInconsistency { .. }));
    }

    fn rejected(fields: fn() -> Vec<FieldDef>, fixed_size: usize) -> bool {
        let bad = SchemaEntry {
            fixed_size,
            fields,
            ..entry(fixed_size)
        };
        matches!(
            HeaderSchema::from_entry(&bad),
            Err(CodecError::RegistryInconsistency { .. })
        )
    }

    #[test]
    fn test_duplicate_field_rejected() {
        fn fields() -> Vec<FieldDef> {
            vec![
                FieldDef::struc_id("TST "),
                FieldDef::long("flags", 0),
                FieldDef::long("flags", 1),
            ]
        }
        assert!(rejected(fields, 12));
    }

    #[test]
    fn test_struc_id_must_come_first() {
        fn fields() -> Vec<FieldDef> {
            vec![FieldDef::long("flags", 0), FieldDef::struc_id("TST ")]
        }
        assert!(rejected(fields, 8));

        fn short_id() -> Vec<FieldDef> {
            vec![FieldDef::struc_id("TS"), FieldDef::long("flags", 0)]
        }
        assert!(rejected(short_id, 8));
    }

    #[test]
    fn test_field_after_trailer_rejected() {
        fn fields() -> Vec<FieldDef> {
            vec![
                FieldDef::struc_id("TST "),
                FieldDef::struc_length(),
                FieldDef::trailer("data", TrailerKind::Raw),
                FieldDef::long("flags", 0),
            ]
        }
        assert!(rejected(fields, 12));
    }

    #[test]
    fn test_override_of_missing_field_rejected() {
        let bad = SchemaEntry {
            overrides: &[("coded_char_set_id", -2)],
            ..entry(20)
        };
        assert!(matches!(
            HeaderSchema::from_entry(&bad),
            Err(CodecError::RegistryInconsistency { .. })
        ));
    }

    #[test]
    fn test_trailer_requires_struc_length() {
        fn fields() -> Vec<FieldDef> {
            vec![
                FieldDef::struc_id("TST "),
                FieldDef::trailer("data", TrailerKind::Raw),
            ]
        }
        let bad = SchemaEntry {
            fixed_size: 4,
            fields,
            ..entry(4)
        };
        assert!(matches!(
            HeaderSchema::from_entry(&bad),
            Err(CodecError::RegistryInconsistency { .. })
        ));
    }

    #[test]
    fn test_default_values() {
        assert_eq!(
            FieldDef::chars("q", 48).default_value(),
            FieldValue::Text(String::new())
        );
        assert_eq!(
            FieldDef::bytes("id", 24).default_value(),
            FieldValue::Bytes(Vec::new())
        );
        assert_eq!(
            FieldDef::trailer("xml", TrailerKind::PaddedStrings).default_value(),
            FieldValue::List(Vec::new())
        );
        assert_eq!(FieldDef::long("x", -1).default_value(), FieldValue::Integer(-1));
    }
}
