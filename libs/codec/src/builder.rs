//! # Chain Encoder
//!
//! ## Purpose
//!
//! Serializes an ordered list of header records plus application data into
//! one contiguous buffer, in the order given. Each record is resolved against
//! the registry, laid out by the marshaller from its defaults with the
//! supplied fields overlaid, and appended; the payload goes last.
//!
//! ## Format Markers
//!
//! [`ChainEncoder::encode`] writes each header's `format` field exactly as
//! supplied. [`ChainEncoder::encode_chained`] derives them instead: every
//! header points at the next header's marker and the last one at the payload
//! format, which is how an application normally wants a chain built.
//!
//! ## Failure
//!
//! Any unknown tag, unknown field or mistyped value fails the whole call; no
//! partially written buffer is ever returned. Structures without a format
//! marker (the descriptor, the character trigger) are rejected with
//! `MissingFormatMarker` by both entry points.

use crate::buffers::{EncodedBuffer, EnvelopeBuffer};
use crate::config::CodecConfig;
use crate::error::{CodecError, CodecResult};
use crate::marshal::FieldMarshaller;
use crate::registry::SchemaRegistry;
use crate::schema::HeaderSchema;
use mq_types::{FormatMarker, HeaderRecord, FORMAT_FIELD};
use tracing::{debug, trace};

/// Output of [`ChainEncoder::encode_chained`]
#[derive(Debug, Clone)]
pub struct ChainedEncoding {
    /// Marker the descriptor must carry to announce the first header
    pub first_format: FormatMarker,
    pub buffer: EncodedBuffer,
}

/// Header chain encoder bound to a registry
#[derive(Debug, Clone, Copy)]
pub struct ChainEncoder<'r> {
    registry: &'r SchemaRegistry,
    marshaller: FieldMarshaller,
    initial_capacity: usize,
    growth_headroom: usize,
}

impl<'r> ChainEncoder<'r> {
    pub fn new(registry: &'r SchemaRegistry, config: &CodecConfig) -> Self {
        Self {
            registry,
            marshaller: FieldMarshaller::new(config.byte_order),
            initial_capacity: config.initial_capacity,
            growth_headroom: config.growth_headroom,
        }
    }

    /// Encodes `headers` in order followed by `payload`, trusting every
    /// header's `format` field as supplied
    ///
    /// A zero `capacity_hint` starts from the configured initial capacity.
    /// Either way the first reservation never exceeds what the call can
    /// need, so an oversized hint cannot exhaust memory.
    pub fn encode(
        &self,
        headers: &[HeaderRecord],
        payload: &[u8],
        capacity_hint: usize,
    ) -> CodecResult<EncodedBuffer> {
        let schemas = headers
            .iter()
            .map(|record| self.chain_schema(record))
            .collect::<CodecResult<Vec<&HeaderSchema>>>()?;

        let upper_bound = schemas
            .iter()
            .map(|schema| schema.fixed_size())
            .fold(payload.len(), usize::saturating_add)
            .saturating_add(self.growth_headroom);
        let capacity = match capacity_hint {
            0 => self.initial_capacity,
            hint => hint,
        };
        let mut buffer =
            EnvelopeBuffer::with_capacity(capacity.min(upper_bound), self.growth_headroom);

        for (record, schema) in headers.iter().zip(schemas) {
            let structure = self.marshaller.encode_fields(schema, record.fields())?;

            buffer.ensure_total(buffer.len() + structure.len() + payload.len());
            buffer.put_slice(&structure);
            trace!(
                header = %schema.header_type(),
                size = structure.len(),
                offset = buffer.len(),
                "Header encoded"
            );
        }

        buffer.ensure_total(buffer.len() + payload.len());
        buffer.put_slice(payload);

        let encoded = buffer.finish();
        debug!(
            headers = headers.len(),
            payload_len = payload.len(),
            total = encoded.len(),
            capacity = encoded.capacity(),
            growth_events = encoded.growth_events(),
            "Header chain encoded"
        );
        Ok(encoded)
    }

    /// Encodes with every `format` field derived from what follows it
    ///
    /// `no_format` headers keep whatever format they were given.
    pub fn encode_chained(
        &self,
        headers: &[HeaderRecord],
        payload: &[u8],
        payload_format: impl Into<FormatMarker>,
        capacity_hint: usize,
    ) -> CodecResult<ChainedEncoding> {
        let payload_format = payload_format.into();
        let schemas = headers
            .iter()
            .map(|record| self.chain_schema(record))
            .collect::<CodecResult<Vec<&HeaderSchema>>>()?;

        let mut chained = headers.to_vec();
        for (index, record) in chained.iter_mut().enumerate() {
            let schema = schemas[index];
            if schema.no_format() || schema.value_field(FORMAT_FIELD).is_none() {
                continue;
            }
            let next = match schemas.get(index + 1) {
                Some(next) => marker_of(next)?,
                None => payload_format,
            };
            record.set_format(next);
        }

        let first_format = match schemas.first() {
            Some(first) => marker_of(first)?,
            None => payload_format,
        };

        let buffer = self.encode(&chained, payload, capacity_hint)?;
        Ok(ChainedEncoding {
            first_format,
            buffer,
        })
    }

    /// Resolves a record that may appear in a chain: structures without a
    /// format marker could never be found again by a decode
    fn chain_schema(&self, record: &HeaderRecord) -> CodecResult<&'r HeaderSchema> {
        let schema = self.registry.lookup_record(record.tag())?;
        marker_of(schema)?;
        Ok(schema)
    }
}

fn marker_of(schema: &HeaderSchema) -> CodecResult<FormatMarker> {
    schema.format().ok_or(CodecError::MissingFormatMarker {
        header_type: schema.header_type(),
    })
}
