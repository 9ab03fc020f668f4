//! # Envelope Codec
//!
//! ## Purpose
//!
//! Joins the message descriptor to the header chain. On the way in, the
//! descriptor's format selects the first header and, once the chain has been
//! peeled off, is rewritten to describe the payload. On the way out, the
//! chain is encoded with derived markers and the descriptor is pointed at
//! the first header again.
//!
//! ## Architecture Role
//!
//! ```text
//! transport get → (MQMD bytes, buffer) → open  → MessageEnvelope
//! MessageEnvelope → seal → (MQMD record, buffer) → transport put
//! ```
//!
//! The descriptor is a fixed 364-byte MQMD handed over by the transport, so
//! unlike chain structures its decode errors are returned to the caller.

use crate::buffers::EncodedBuffer;
use crate::builder::ChainEncoder;
use crate::config::CodecConfig;
use crate::error::CodecResult;
use crate::marshal::FieldMarshaller;
use crate::parser::{ChainDecoder, ChainTermination, DecodedMessage};
use crate::registry::SchemaRegistry;
use crate::schema::HeaderSchema;
use mq_types::{FormatMarker, HeaderRecord, HeaderType, MessageEnvelope};
use tracing::trace;

/// Output of [`EnvelopeCodec::seal`]
#[derive(Debug, Clone)]
pub struct SealedMessage {
    /// Descriptor with `format` announcing the first header
    pub descriptor: HeaderRecord,
    pub buffer: EncodedBuffer,
}

/// Descriptor + chain codec
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeCodec<'r> {
    descriptor_schema: &'r HeaderSchema,
    marshaller: FieldMarshaller,
    decoder: ChainDecoder<'r>,
    encoder: ChainEncoder<'r>,
}

impl<'r> EnvelopeCodec<'r> {
    pub fn new(registry: &'r SchemaRegistry, config: &CodecConfig) -> CodecResult<Self> {
        Ok(Self {
            descriptor_schema: registry.lookup_by_tag(HeaderType::MessageDescriptor)?,
            marshaller: FieldMarshaller::new(config.byte_order),
            decoder: ChainDecoder::new(registry, config),
            encoder: ChainEncoder::new(registry, config),
        })
    }

    /// Decodes a raw MQMD
    pub fn decode_descriptor(&self, raw: &[u8]) -> CodecResult<HeaderRecord> {
        self.marshaller
            .verify_struc_id(self.descriptor_schema, raw, 0)?;
        let (fields, _) = self
            .marshaller
            .decode_fields(self.descriptor_schema, raw, 0)?;
        Ok(HeaderRecord::from_parts(HeaderType::MessageDescriptor, fields))
    }

    /// Encodes a descriptor record into a raw MQMD
    pub fn encode_descriptor(&self, descriptor: &HeaderRecord) -> CodecResult<Vec<u8>> {
        self.marshaller
            .encode_fields(self.descriptor_schema, descriptor.fields())
    }

    /// Descriptor with every default filled in, as a decode would return it
    pub fn default_descriptor(&self) -> CodecResult<HeaderRecord> {
        let fields = self
            .marshaller
            .with_defaults(self.descriptor_schema, &Default::default())?;
        Ok(HeaderRecord::from_parts(HeaderType::MessageDescriptor, fields))
    }

    /// Splits a received buffer into headers and payload
    pub fn open(&self, descriptor: HeaderRecord, buffer: &[u8]) -> MessageEnvelope {
        let format = descriptor.format().unwrap_or(FormatMarker::NONE);
        let decoded = self.decoder.decode(format, buffer);
        Self::assemble(descriptor, decoded)
    }

    /// [`EnvelopeCodec::open`] from a raw MQMD
    pub fn open_raw(&self, descriptor: &[u8], buffer: &[u8]) -> CodecResult<MessageEnvelope> {
        let descriptor = self.decode_descriptor(descriptor)?;
        Ok(self.open(descriptor, buffer))
    }

    fn assemble(mut descriptor: HeaderRecord, decoded: DecodedMessage) -> MessageEnvelope {
        if !decoded.headers.is_empty() {
            match decoded.termination {
                ChainTermination::UnrecognizedFormat(marker)
                | ChainTermination::CorruptStructure { marker, .. } => {
                    descriptor.set_format(marker)
                }
                ChainTermination::BlankFormat => descriptor.set_format(FormatMarker::NONE),
                // the payload of an XQH or TM is described by the header itself
                ChainTermination::NoFormatHeader(_) => {}
            }
        }
        trace!(headers = decoded.headers.len(), "Envelope opened");

        MessageEnvelope {
            descriptor,
            headers: decoded.headers,
            payload: decoded.payload,
        }
    }

    /// Encodes an envelope for sending, chaining the format markers
    pub fn seal(
        &self,
        envelope: &MessageEnvelope,
        capacity_hint: usize,
    ) -> CodecResult<SealedMessage> {
        let payload_format = envelope.payload_format().unwrap_or(FormatMarker::NONE);
        let chained = self.encoder.encode_chained(
            &envelope.headers,
            &envelope.payload,
            payload_format,
            capacity_hint,
        )?;

        let mut descriptor = envelope.descriptor.clone();
        descriptor.set_format(chained.first_format);
        Ok(SealedMessage {
            descriptor,
            buffer: chained.buffer,
        })
    }
}
