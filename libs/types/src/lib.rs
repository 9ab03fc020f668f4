//! # MQ Envelope Types
//!
//! ## Purpose
//!
//! Pure data definitions for messages exchanged with a queue manager: the
//! closed set of header types, 8-byte format markers, 4-byte struct ids,
//! generic header records and the message envelope that owns them.
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types  →  libs/codec  →  transport (external)
//!     ↑              ↓                ↓
//! Pure Data     Layout Rules     Queue Manager
//! HeaderRecord  Chain Decoder    get / put
//! FieldValue    Chain Encoder
//! ```
//!
//! ## What This Crate Contains
//! - [`HeaderType`] / [`HeaderTag`]: structure kinds and record tags
//! - [`FormatMarker`] / [`StrucId`]: fixed-width identifiers
//! - [`FieldValue`], [`NameValueMap`], [`FieldMap`], [`HeaderRecord`]
//! - [`MessageEnvelope`]: descriptor + header chain + payload
//! - MQ numeric constants used as structure defaults
//!
//! ## What This Crate Does NOT Contain
//! - Byte layouts or any encoding logic (belongs in libs/codec)
//! - Transport or queue manager sessions

pub mod constants;
pub mod envelope;
pub mod errors;
pub mod header;

pub use envelope::MessageEnvelope;
pub use errors::TypesError;
pub use header::{
    FieldMap, FieldValue, FormatMarker, HeaderRecord, HeaderTag, HeaderType, NameValue,
    NameValueMap, StrucId, FORMAT_FIELD, FORMAT_MARKER_LEN, STRUC_ID_LEN,
};
