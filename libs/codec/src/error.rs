//! Codec errors for header chain processing
//!
//! Decode-side variants (`TruncatedBuffer`, `StructIdMismatch`,
//! `InvalidStrucLength`) are produced by the marshaller and absorbed by the
//! chain decoder, which turns them into a chain termination. Encode-side
//! variants always reach the caller. `RegistryInconsistency` only ever comes
//! out of registry construction.

use mq_types::{HeaderType, StrucId};
use thiserror::Error;

/// Errors raised while marshalling header structures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Structure needs more bytes than the buffer holds
    #[error("Truncated buffer: {header_type} at offset {offset} needs {need} bytes, {available} available")]
    TruncatedBuffer {
        header_type: HeaderType,
        offset: usize,
        need: usize,
        available: usize,
    },

    /// Format marker matched but the embedded struct id did not
    #[error("Struct id mismatch at offset {offset}: {header_type} expects '{expected}', found 0x{found_hex}")]
    StructIdMismatch {
        header_type: HeaderType,
        offset: usize,
        expected: String,
        found_hex: String,
    },

    /// Inline length smaller than the fixed part of the structure
    #[error("Invalid StrucLength {declared} for {header_type} at offset {offset}: fixed part is {fixed_size} bytes")]
    InvalidStrucLength {
        header_type: HeaderType,
        offset: usize,
        declared: i32,
        fixed_size: usize,
    },

    /// Record names a field the schema does not declare
    #[error("Unknown field '{field}' for {header_type}")]
    UnknownField {
        header_type: HeaderType,
        field: String,
    },

    /// Record tag has no schema in the registry
    #[error("Unknown header type '{name}'")]
    UnknownHeaderType { name: String },

    /// Value kind does not fit the field's binary kind
    #[error("Field '{field}' of {header_type} expects {expected}, got {found}")]
    FieldTypeMismatch {
        header_type: HeaderType,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Encoded structure does not fit an MQLONG length
    #[error("{header_type} structure of {size} bytes exceeds the StrucLength range")]
    StructureTooLarge { header_type: HeaderType, size: usize },

    /// Chained encode needs a marker for a header whose schema has none
    #[error("{header_type} has no format marker and cannot follow another header")]
    MissingFormatMarker { header_type: HeaderType },

    /// Schema table is internally inconsistent
    #[error("Registry inconsistency: {reason}")]
    RegistryInconsistency { reason: String },
}

impl CodecError {
    pub fn truncated(
        header_type: HeaderType,
        offset: usize,
        need: usize,
        available: usize,
    ) -> Self {
        Self::TruncatedBuffer {
            header_type,
            offset,
            need,
            available,
        }
    }

    pub fn struct_id_mismatch(
        header_type: HeaderType,
        offset: usize,
        expected: StrucId,
        found: &[u8],
    ) -> Self {
        Self::StructIdMismatch {
            header_type,
            offset,
            expected: expected.to_string(),
            found_hex: hex::encode(found),
        }
    }

    pub fn unknown_field(header_type: HeaderType, field: impl Into<String>) -> Self {
        Self::UnknownField {
            header_type,
            field: field.into(),
        }
    }

    pub fn unknown_header_type(name: impl Into<String>) -> Self {
        Self::UnknownHeaderType { name: name.into() }
    }

    pub fn inconsistent(reason: impl Into<String>) -> Self {
        Self::RegistryInconsistency {
            reason: reason.into(),
        }
    }

    /// True for the variants the chain decoder turns into payload
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::TruncatedBuffer { .. }
                | Self::StructIdMismatch { .. }
                | Self::InvalidStrucLength { .. }
        )
    }
}

/// Result type for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Errors raised while loading [`crate::CodecConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid codec config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_id_mismatch_renders_hex() {
        let error = CodecError::struct_id_mismatch(
            HeaderType::DeadLetterHeader,
            16,
            StrucId::new(*b"DLH "),
            b"XXXX",
        );
        let message = error.to_string();
        assert!(message.contains("offset 16"));
        assert!(message.contains("'DLH '"));
        assert!(message.contains("0x58585858"));
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_encode_errors_not_recoverable() {
        assert!(!CodecError::unknown_header_type("bogus").is_recoverable());
        assert!(!CodecError::unknown_field(HeaderType::Ims, "nope").is_recoverable());
        assert_eq!(
            CodecError::unknown_header_type("bogus").to_string(),
            "Unknown header type 'bogus'"
        );
    }
}
