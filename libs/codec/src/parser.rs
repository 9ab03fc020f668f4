//! # Chain Decoder
//!
//! ## Purpose
//!
//! Walks an unknown-length buffer received from the transport, peeling off
//! one recognized header structure at a time until the format chain ends,
//! and hands back the header records plus whatever follows as payload.
//!
//! ## Walk
//!
//! ```text
//! marker ← descriptor.format, offset ← 0
//! loop:
//!   blank marker            → stop
//!   marker not in registry  → stop (payload format)
//!   struct id mismatch      → stop, structure becomes payload
//!   truncated / bad length  → stop, structure becomes payload
//!   decode fields, push record
//!   no_format header        → stop after it
//!   marker ← record.format, offset += structure size
//! ```
//!
//! Decoding never fails: every anomaly ends the walk at the start of the
//! offending structure. Set `report_decode_anomalies` to get the error back
//! on the result.

use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::marshal::FieldMarshaller;
use crate::registry::SchemaRegistry;
use bytes::Bytes;
use mq_types::{FormatMarker, HeaderRecord, HeaderType, FORMAT_MARKER_LEN};
use tracing::{debug, trace, warn};

/// Why the header chain ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainTermination {
    /// Format marker was blank
    BlankFormat,
    /// Format marker names application data rather than a header
    UnrecognizedFormat(FormatMarker),
    /// A trigger or transmission-queue header closed the chain
    NoFormatHeader(HeaderType),
    /// A structure announced by `marker` could not be decoded
    CorruptStructure {
        marker: FormatMarker,
        header_type: HeaderType,
        offset: usize,
    },
}

/// Result of a chain walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage {
    pub headers: Vec<HeaderRecord>,
    pub payload: Bytes,
    pub termination: ChainTermination,
    /// Error that ended the walk, when anomaly reporting is enabled
    pub anomaly: Option<CodecError>,
}

impl DecodedMessage {
    /// Format of the payload: the marker the chain stopped on, if any
    pub fn payload_format(&self) -> Option<FormatMarker> {
        match &self.termination {
            ChainTermination::UnrecognizedFormat(marker)
            | ChainTermination::CorruptStructure { marker, .. } => Some(*marker),
            ChainTermination::BlankFormat | ChainTermination::NoFormatHeader(_) => None,
        }
    }

    pub fn into_parts(self) -> (Vec<HeaderRecord>, Bytes) {
        (self.headers, self.payload)
    }
}

struct ChainWalk {
    headers: Vec<HeaderRecord>,
    payload_offset: usize,
    termination: ChainTermination,
    anomaly: Option<CodecError>,
}

/// Header chain decoder bound to a registry
#[derive(Debug, Clone, Copy)]
pub struct ChainDecoder<'r> {
    registry: &'r SchemaRegistry,
    marshaller: FieldMarshaller,
    report_anomalies: bool,
}

impl<'r> ChainDecoder<'r> {
    pub fn new(registry: &'r SchemaRegistry, config: &CodecConfig) -> Self {
        Self {
            registry,
            marshaller: FieldMarshaller::new(config.byte_order),
            report_anomalies: config.report_decode_anomalies,
        }
    }

    /// Decodes `buffer` starting from the descriptor's format marker
    pub fn decode(&self, format: impl Into<FormatMarker>, buffer: &[u8]) -> DecodedMessage {
        let walk = self.walk(format.into(), buffer);
        DecodedMessage {
            headers: walk.headers,
            payload: Bytes::copy_from_slice(&buffer[walk.payload_offset..]),
            termination: walk.termination,
            anomaly: walk.anomaly,
        }
    }

    /// Like [`ChainDecoder::decode`], slicing the payload out of `buffer`
    /// without copying
    pub fn decode_shared(&self, format: impl Into<FormatMarker>, buffer: Bytes) -> DecodedMessage {
        let walk = self.walk(format.into(), &buffer);
        DecodedMessage {
            headers: walk.headers,
            payload: buffer.slice(walk.payload_offset..),
            termination: walk.termination,
            anomaly: walk.anomaly,
        }
    }

    fn walk(&self, initial: FormatMarker, buffer: &[u8]) -> ChainWalk {
        let mut headers = Vec::new();
        let mut offset = 0;
        let mut marker = initial;

        let (termination, anomaly) = loop {
            if marker.is_blank() {
                break (ChainTermination::BlankFormat, None);
            }

            let Some(schema) = self.registry.lookup_by_format_marker(&marker) else {
                break (ChainTermination::UnrecognizedFormat(marker), None);
            };

            let decoded = self
                .marshaller
                .verify_struc_id(schema, buffer, offset)
                .and_then(|()| self.marshaller.decode_fields(schema, buffer, offset));

            let (fields, size) = match decoded {
                Ok(decoded) => decoded,
                Err(error) => {
                    let termination = ChainTermination::CorruptStructure {
                        marker,
                        header_type: schema.header_type(),
                        offset,
                    };
                    if self.report_anomalies {
                        warn!(
                            %error,
                            headers = headers.len(),
                            "Header chain ended on corrupt structure"
                        );
                        break (termination, Some(error));
                    }
                    debug!(
                        %error,
                        headers = headers.len(),
                        "Header chain ended on corrupt structure"
                    );
                    break (termination, None);
                }
            };

            // taken from the raw field so non-text marker bytes survive
            let next = schema
                .format_offset()
                .and_then(|at| buffer.get(offset + at..offset + at + FORMAT_MARKER_LEN))
                .map_or(FormatMarker::NONE, FormatMarker::from_bytes);
            headers.push(HeaderRecord::from_parts(schema.header_type(), fields));
            offset += size;
            trace!(header = %schema.header_type(), offset, next = %next, "Header decoded");

            if schema.no_format() {
                break (ChainTermination::NoFormatHeader(schema.header_type()), None);
            }
            marker = next;
        };

        debug!(
            headers = headers.len(),
            payload_offset = offset,
            payload_len = buffer.len() - offset,
            ?termination,
            "Header chain decoded"
        );

        ChainWalk {
            headers,
            payload_offset: offset,
            termination,
            anomaly,
        }
    }
}
