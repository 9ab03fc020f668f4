//! # MQ Envelope Codec
//!
//! ## Purpose
//!
//! The "rules" layer for messages exchanged with a queue manager. Translates
//! between a raw buffer as handed over by the transport and a structured,
//! ordered chain of typed headers followed by opaque application data:
//! - Header schema registry (layouts, defaults, format markers)
//! - Field marshaller (one structure ↔ one record)
//! - Chain decoder: walks format markers, never fails
//! - Chain encoder: lays out headers and payload, growing the buffer on demand
//! - Descriptor and envelope handling on top of both
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → [codec] → transport (external)
//!     ↑           ↓              ↓
//! Pure Data   Layout Rules   get / put
//! HeaderRecord ChainDecoder  raw buffers
//! FieldValue   ChainEncoder
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Queue manager sessions, connections or syncpoint control
//! - Validation of business content such as reason codes
//!
//! ## Usage
//!
//! ```rust
//! use mq_codec::{decode, encode};
//! use mq_types::{HeaderRecord, HeaderType};
//!
//! let headers = vec![HeaderRecord::new(HeaderType::DeadLetterHeader)
//!     .with("reason", 2085)
//!     .with("format", "MQSTR")];
//! let buffer = encode(&headers, b"hello", 512)?;
//!
//! let decoded = decode("MQDEAD", buffer.as_slice());
//! assert_eq!(decoded.headers[0].integer("reason"), Some(2085));
//! assert_eq!(decoded.payload.as_ref(), b"hello");
//! # Ok::<(), mq_codec::CodecError>(())
//! ```

pub mod builder;
pub mod buffers;
pub mod config;
pub mod envelope;
pub mod error;
pub mod marshal;
pub mod parser;
pub mod registry;
pub mod schema;

pub use buffers::{EncodedBuffer, EnvelopeBuffer};
pub use builder::{ChainEncoder, ChainedEncoding};
pub use config::{CodecConfig, Endianness};
pub use envelope::{EnvelopeCodec, SealedMessage};
pub use error::{CodecError, CodecResult, ConfigError};
pub use marshal::FieldMarshaller;
pub use parser::{ChainDecoder, ChainTermination, DecodedMessage};
pub use registry::SchemaRegistry;
pub use schema::{FieldDef, FieldKind, FieldRole, HeaderSchema, SchemaEntry, TrailerKind};

use mq_types::{FormatMarker, HeaderRecord};

/// Decodes `buffer` with the process-wide registry and default configuration
pub fn decode(format: impl Into<FormatMarker>, buffer: &[u8]) -> DecodedMessage {
    ChainDecoder::new(SchemaRegistry::global(), &CodecConfig::default()).decode(format, buffer)
}

/// Encodes `headers` then `payload` with the process-wide registry and
/// default configuration
pub fn encode(
    headers: &[HeaderRecord],
    payload: &[u8],
    capacity_hint: usize,
) -> CodecResult<EncodedBuffer> {
    ChainEncoder::new(SchemaRegistry::global(), &CodecConfig::default()).encode(
        headers,
        payload,
        capacity_hint,
    )
}
