//! # Field Marshaller
//!
//! ## Purpose
//!
//! Converts between one binary structure at an offset in a buffer and one
//! generic [`FieldMap`]. This is the only component that touches raw field
//! offsets; the chain decoder and encoder work in whole structures.
//!
//! ## Field Encoding Rules
//!
//! - **Long**: 4-byte signed integer, configured byte order
//! - **Chars(n)**: space-padded on encode, trailing spaces and NULs trimmed
//!   on decode, over-long values truncated
//! - **Bytes(n)**: NUL-padded on encode, trailing NULs trimmed on decode
//! - **Trailer**: fills the structure up to its inline `StrucLength`, which
//!   is backpatched after the trailer has been sized

mod trailer;

use crate::config::Endianness;
use crate::error::{CodecError, CodecResult};
use crate::schema::{FieldDef, FieldKind, FieldRole, HeaderSchema, TrailerKind};
use mq_types::{FieldMap, FieldValue, StrucId, STRUC_ID_LEN};
use tracing::{debug, trace};

/// Right-trims the pad of a character field
fn trim_chars(raw: &[u8]) -> &[u8] {
    let end = raw
        .iter()
        .rposition(|byte| *byte != b' ' && *byte != 0)
        .map_or(0, |pos| pos + 1);
    &raw[..end]
}

/// Right-trims the pad of a byte field
fn trim_nuls(raw: &[u8]) -> &[u8] {
    let end = raw.iter().rposition(|byte| *byte != 0).map_or(0, |pos| pos + 1);
    &raw[..end]
}

fn chars_to_text(raw: &[u8]) -> String {
    String::from_utf8_lossy(trim_chars(raw)).into_owned()
}

/// Bidirectional structure ↔ record conversion for one byte order
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMarshaller {
    byte_order: Endianness,
}

impl FieldMarshaller {
    pub fn new(byte_order: Endianness) -> Self {
        Self { byte_order }
    }

    pub fn byte_order(&self) -> Endianness {
        self.byte_order
    }

    /// Checks the 4-byte struct id at `offset`
    pub fn verify_struc_id(
        &self,
        schema: &HeaderSchema,
        buffer: &[u8],
        offset: usize,
    ) -> CodecResult<()> {
        let expected = schema.struc_id();
        let available = buffer.len().saturating_sub(offset);
        let found = buffer
            .get(offset..)
            .and_then(StrucId::read)
            .ok_or_else(|| {
                CodecError::truncated(schema.header_type(), offset, STRUC_ID_LEN, available)
            })?;

        if found != expected {
            return Err(CodecError::struct_id_mismatch(
                schema.header_type(),
                offset,
                expected,
                found.as_bytes(),
            ));
        }
        Ok(())
    }

    /// Decodes the structure at `offset`, returning its visible fields in
    /// schema order and the number of bytes it occupies
    pub fn decode_fields(
        &self,
        schema: &HeaderSchema,
        buffer: &[u8],
        offset: usize,
    ) -> CodecResult<(FieldMap, usize)> {
        let header_type = schema.header_type();
        let fixed_size = schema.fixed_size();
        let available = buffer.len().saturating_sub(offset);
        if available < fixed_size {
            return Err(CodecError::truncated(header_type, offset, fixed_size, available));
        }

        let mut size = fixed_size;
        if schema.is_variable_length() {
            if let Some(length_offset) = schema.struc_length_offset() {
                let at = offset + length_offset;
                let declared = self.byte_order.read_i32(&buffer[at..at + 4]);
                size = usize::try_from(declared)
                    .ok()
                    .filter(|declared| *declared >= fixed_size)
                    .ok_or(CodecError::InvalidStrucLength {
                        header_type,
                        offset,
                        declared,
                        fixed_size,
                    })?;
                if size > available {
                    return Err(CodecError::truncated(header_type, offset, size, available));
                }
            }
        }

        let structure = &buffer[offset..offset + size];
        let mut fields = FieldMap::with_capacity(schema.value_fields().count());
        for (field, field_offset) in schema.layout() {
            if field.role != FieldRole::Value {
                continue;
            }
            let slot = &structure[field_offset..];
            let value = match field.kind {
                FieldKind::Long => FieldValue::Integer(self.byte_order.read_i32(&slot[..4])),
                FieldKind::Chars(width) => FieldValue::Text(chars_to_text(&slot[..width])),
                FieldKind::Bytes(width) => FieldValue::Bytes(trim_nuls(&slot[..width]).to_vec()),
                FieldKind::Trailer(TrailerKind::Raw) => FieldValue::Bytes(slot.to_vec()),
                FieldKind::Trailer(TrailerKind::NameValues) => {
                    FieldValue::NameValues(trailer::decode_name_values(slot, self.byte_order))
                }
                FieldKind::Trailer(TrailerKind::PaddedStrings) => {
                    FieldValue::List(trailer::decode_padded_strings(slot, self.byte_order))
                }
            };
            fields.insert(field.name, value);
        }

        trace!(
            header = %header_type,
            offset,
            size,
            "Decoded {}",
            schema.struct_name()
        );
        Ok((fields, size))
    }

    /// Encodes one structure: defaults first, supplied fields overlaid,
    /// inline length backpatched last
    pub fn encode_fields(&self, schema: &HeaderSchema, fields: &FieldMap) -> CodecResult<Vec<u8>> {
        let resolved = self.with_defaults(schema, fields)?;
        let mut out = vec![0u8; schema.fixed_size()];

        for (field, field_offset) in schema.layout() {
            let value = match field.role {
                FieldRole::Value => match resolved.get(field.name) {
                    Some(value) => value.clone(),
                    None => field.default_value(),
                },
                FieldRole::StrucId | FieldRole::Constant => field.default_value(),
                // backpatched below
                FieldRole::StrucLength => continue,
            };

            let slot = field_offset..field_offset + field.kind.width();
            match (field.kind, &value) {
                (FieldKind::Long, FieldValue::Integer(number)) => {
                    self.byte_order.write_i32(&mut out[slot], *number);
                }
                (FieldKind::Chars(_), FieldValue::Text(text)) => {
                    fill_padded(&mut out[slot], text.as_bytes(), b' ');
                }
                (FieldKind::Bytes(_), FieldValue::Bytes(raw)) => {
                    fill_padded(&mut out[slot], raw, 0);
                }
                (FieldKind::Trailer(_), value) => {
                    out.extend_from_slice(&self.encode_trailer(value));
                }
                (kind, value) => {
                    return Err(CodecError::FieldTypeMismatch {
                        header_type: schema.header_type(),
                        field: field.name.to_string(),
                        expected: kind.expected(),
                        found: value.kind_name(),
                    })
                }
            }
        }

        if let Some(length_offset) = schema.struc_length_offset() {
            let total = i32::try_from(out.len()).map_err(|_| CodecError::StructureTooLarge {
                header_type: schema.header_type(),
                size: out.len(),
            })?;
            self.byte_order
                .write_i32(&mut out[length_offset..length_offset + 4], total);
        }

        trace!(
            header = %schema.header_type(),
            size = out.len(),
            "Encoded {}",
            schema.struct_name()
        );
        Ok(out)
    }

    fn encode_trailer(&self, value: &FieldValue) -> Vec<u8> {
        match value {
            FieldValue::Bytes(raw) => raw.clone(),
            FieldValue::NameValues(map) => trailer::encode_name_values(map, self.byte_order),
            FieldValue::List(items) => trailer::encode_padded_strings(items, self.byte_order),
            // with_defaults only lets the three kinds above through
            FieldValue::Integer(_) | FieldValue::Text(_) => Vec::new(),
        }
    }

    /// The fully defaulted record exactly as decoding the encoded structure
    /// would return it
    ///
    /// Fails with `UnknownField` for names outside the schema (control
    /// fields included) and `FieldTypeMismatch` for values of the wrong kind.
    pub fn with_defaults(&self, schema: &HeaderSchema, fields: &FieldMap) -> CodecResult<FieldMap> {
        for name in fields.names() {
            if schema.value_field(name).is_none() {
                return Err(CodecError::unknown_field(schema.header_type(), name));
            }
        }

        let mut resolved = FieldMap::with_capacity(schema.value_fields().count());
        for field in schema.value_fields() {
            let value = match fields.get(field.name) {
                Some(value) => canonical(schema, field, value)?,
                None => canonical(schema, field, &field.default_value())?,
            };
            resolved.insert(field.name, value);
        }
        Ok(resolved)
    }
}

/// Copies `value` into `slot`, truncating or padding with `fill`
fn fill_padded(slot: &mut [u8], value: &[u8], fill: u8) {
    let used = value.len().min(slot.len());
    slot[..used].copy_from_slice(&value[..used]);
    slot[used..].fill(fill);
}

/// Normalizes a supplied value to its decoded form
fn canonical(
    schema: &HeaderSchema,
    field: &FieldDef,
    value: &FieldValue,
) -> CodecResult<FieldValue> {
    let mismatch = || CodecError::FieldTypeMismatch {
        header_type: schema.header_type(),
        field: field.name.to_string(),
        expected: field.kind.expected(),
        found: value.kind_name(),
    };

    let canonical = match (field.kind, value) {
        (FieldKind::Long, FieldValue::Integer(number)) => FieldValue::Integer(*number),
        (FieldKind::Chars(width), FieldValue::Text(text)) => {
            FieldValue::Text(chars_to_text(truncated(schema, field, text.as_bytes(), width)))
        }
        (FieldKind::Chars(width), FieldValue::Bytes(raw)) => {
            FieldValue::Text(chars_to_text(truncated(schema, field, raw, width)))
        }
        (FieldKind::Bytes(width), FieldValue::Bytes(raw)) => {
            FieldValue::Bytes(trim_nuls(truncated(schema, field, raw, width)).to_vec())
        }
        (FieldKind::Bytes(width), FieldValue::Text(text)) => {
            FieldValue::Bytes(trim_nuls(truncated(schema, field, text.as_bytes(), width)).to_vec())
        }
        (FieldKind::Trailer(TrailerKind::Raw), FieldValue::Bytes(raw)) => {
            FieldValue::Bytes(raw.clone())
        }
        (FieldKind::Trailer(TrailerKind::Raw), FieldValue::Text(text)) => {
            FieldValue::Bytes(text.as_bytes().to_vec())
        }
        (FieldKind::Trailer(TrailerKind::NameValues), FieldValue::NameValues(map)) => {
            // lists collapse or vanish exactly as a decode would see them
            FieldValue::NameValues(map.pairs().collect())
        }
        (FieldKind::Trailer(TrailerKind::PaddedStrings), FieldValue::List(items)) => {
            FieldValue::List(
                items
                    .iter()
                    .map(|item| item.trim_end_matches(' ').to_string())
                    .collect(),
            )
        }
        (FieldKind::Trailer(TrailerKind::PaddedStrings), FieldValue::Text(text)) => {
            FieldValue::List(vec![text.trim_end_matches(' ').to_string()])
        }
        _ => return Err(mismatch()),
    };
    Ok(canonical)
}

fn truncated<'a>(schema: &HeaderSchema, field: &FieldDef, raw: &'a [u8], width: usize) -> &'a [u8] {
    if raw.len() > width {
        debug!(
            header = %schema.header_type(),
            field = field.name,
            width,
            supplied = raw.len(),
            "Value truncated to field width"
        );
        &raw[..width]
    } else {
        raw
    }
}
