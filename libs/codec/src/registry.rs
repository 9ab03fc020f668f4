//! # Header Schema Registry
//!
//! ## Purpose
//!
//! Immutable lookup table from header type and from format marker to the
//! validated [`HeaderSchema`]. Built once; every decoder and encoder borrows
//! it. Construction is the only place a [`CodecError::RegistryInconsistency`]
//! can come from.
//!
//! ## Architecture Role
//!
//! ```text
//! SCHEMA_TABLE ──build──→ SchemaRegistry ←──borrow── ChainDecoder
//!                              ↑                      ChainEncoder
//!                      lookup_by_tag / lookup_by_format_marker
//! ```

use crate::error::{CodecError, CodecResult};
use crate::schema::definitions::SCHEMA_TABLE;
use crate::schema::{HeaderSchema, SchemaEntry};
use mq_types::{FormatMarker, HeaderTag, HeaderType};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::info;

static GLOBAL_REGISTRY: Lazy<SchemaRegistry> = Lazy::new(|| {
    SchemaRegistry::new()
        .unwrap_or_else(|error| panic!("built-in MQ schema table is inconsistent: {error}"))
});

/// Schema lookup by tag and by format marker
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<HeaderSchema>,
    by_tag: HashMap<HeaderType, usize>,
    by_format: HashMap<FormatMarker, usize>,
}

impl SchemaRegistry {
    /// Builds the registry from the built-in schema table
    pub fn new() -> CodecResult<Self> {
        Self::from_entries(SCHEMA_TABLE)
    }

    /// Builds a registry from an arbitrary table, rejecting duplicate tags
    /// and duplicate markers
    pub fn from_entries(entries: &[SchemaEntry]) -> CodecResult<Self> {
        let mut schemas = Vec::with_capacity(entries.len());
        let mut by_tag = HashMap::with_capacity(entries.len());
        let mut by_format = HashMap::with_capacity(entries.len());

        for entry in entries {
            let schema = HeaderSchema::from_entry(entry)?;
            let index = schemas.len();

            if by_tag.insert(schema.header_type(), index).is_some() {
                return Err(CodecError::inconsistent(format!(
                    "duplicate header type {}",
                    schema.header_type()
                )));
            }

            if let Some(marker) = schema.format() {
                if marker.is_blank() {
                    return Err(CodecError::inconsistent(format!(
                        "{} declares a blank format marker",
                        schema.struct_name()
                    )));
                }
                if let Some(existing) = by_format.insert(marker, index) {
                    let existing: &HeaderSchema = &schemas[existing];
                    return Err(CodecError::inconsistent(format!(
                        "format marker '{marker}' claimed by {} and {}",
                        existing.struct_name(),
                        schema.struct_name()
                    )));
                }
            }

            schemas.push(schema);
        }

        info!(
            schemas = schemas.len(),
            chainable = by_format.len(),
            "MQ header schema registry built"
        );

        Ok(Self {
            schemas,
            by_tag,
            by_format,
        })
    }

    /// Process-wide registry built from the built-in table
    ///
    /// # Panics
    ///
    /// On first use, if the built-in table is inconsistent. That is a
    /// programming error and aborts startup.
    pub fn global() -> &'static SchemaRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn lookup_by_tag(&self, header_type: HeaderType) -> CodecResult<&HeaderSchema> {
        self.by_tag
            .get(&header_type)
            .map(|index| &self.schemas[*index])
            .ok_or_else(|| CodecError::unknown_header_type(header_type.name()))
    }

    /// Resolves a record tag, failing for unrecognized names
    pub fn lookup_record(&self, tag: &HeaderTag) -> CodecResult<&HeaderSchema> {
        match tag {
            HeaderTag::Known(header_type) => self.lookup_by_tag(*header_type),
            HeaderTag::Other(name) => Err(CodecError::unknown_header_type(name.as_str())),
        }
    }

    pub fn lookup_by_format_marker(&self, marker: &FormatMarker) -> Option<&HeaderSchema> {
        self.by_format.get(marker).map(|index| &self.schemas[*index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderSchema> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
