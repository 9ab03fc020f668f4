//! Fixed-width identifiers embedded in every MQ structure
//!
//! A [`FormatMarker`] is the 8-byte space-padded name a structure uses to
//! announce the type of whatever follows it. A [`StrucId`] is the 4-byte tag
//! at offset zero of the structure itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of a format marker on the wire
pub const FORMAT_MARKER_LEN: usize = 8;

/// Width of a struct id on the wire
pub const STRUC_ID_LEN: usize = 4;

/// 8-byte, space-padded format name
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormatMarker([u8; FORMAT_MARKER_LEN]);

impl FormatMarker {
    /// No format: blank marker, ends a header chain
    pub const NONE: Self = Self(*b"        ");
    /// Character string application data
    pub const STRING: Self = Self(*b"MQSTR   ");
    pub const DEAD_LETTER_HEADER: Self = Self(*b"MQDEAD  ");
    pub const CICS: Self = Self(*b"MQCICS  ");
    pub const DIST_HEADER: Self = Self(*b"MQHDIST ");
    pub const IMS: Self = Self(*b"MQIMS   ");
    pub const RF_HEADER: Self = Self(*b"MQHRF   ");
    pub const RF_HEADER_2: Self = Self(*b"MQHRF2  ");
    pub const REF_MSG_HEADER: Self = Self(*b"MQHREF  ");
    pub const TRIGGER: Self = Self(*b"MQTRIG  ");
    pub const WORK_INFO_HEADER: Self = Self(*b"MQHWIH  ");
    pub const XMIT_Q_HEADER: Self = Self(*b"MQXMIT  ");
    pub const ADMIN: Self = Self(*b"MQADMIN ");
    pub const EVENT: Self = Self(*b"MQEVENT ");
    pub const PCF: Self = Self(*b"MQPCF   ");

    /// Builds a marker from text, space-padding or truncating to 8 bytes
    pub fn new(name: &str) -> Self {
        Self::from_bytes(name.as_bytes())
    }

    /// Builds a marker from raw bytes; trailing NULs are treated as blanks
    pub fn from_bytes(raw: &[u8]) -> Self {
        let mut marker = [b' '; FORMAT_MARKER_LEN];
        for (slot, byte) in marker.iter_mut().zip(raw.iter()) {
            *slot = if *byte == 0 { b' ' } else { *byte };
        }
        Self(marker)
    }

    /// Raw padded bytes as written on the wire
    pub fn as_bytes(&self) -> &[u8; FORMAT_MARKER_LEN] {
        &self.0
    }

    /// Marker bytes without the trailing pad
    pub fn trimmed(&self) -> &[u8] {
        let end = self
            .0
            .iter()
            .rposition(|b| *b != b' ')
            .map_or(0, |pos| pos + 1);
        &self.0[..end]
    }

    /// Marker text without the trailing pad; empty if it is not UTF-8
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(self.trimmed()).unwrap_or("")
    }

    /// True when the marker is all blanks (MQFMT_NONE)
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|b| *b == b' ')
    }
}

impl Default for FormatMarker {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<&str> for FormatMarker {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Lossy for markers that are not UTF-8
impl fmt::Display for FormatMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.trimmed()))
    }
}

impl fmt::Debug for FormatMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FormatMarker({:?})", String::from_utf8_lossy(self.trimmed()))
    }
}

/// 4-byte structure identifier, e.g. `DLH ` or `RFH `
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrucId([u8; STRUC_ID_LEN]);

impl StrucId {
    pub const fn new(raw: [u8; STRUC_ID_LEN]) -> Self {
        Self(raw)
    }

    /// Reads the id at the start of `raw`, if there are enough bytes
    pub fn read(raw: &[u8]) -> Option<Self> {
        let bytes: [u8; STRUC_ID_LEN] = raw.get(..STRUC_ID_LEN)?.try_into().ok()?;
        Some(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; STRUC_ID_LEN] {
        &self.0
    }

    /// Hex rendering for diagnostics, since corrupt ids are rarely printable
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for StrucId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for StrucId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StrucId({:?} 0x{})", self.to_string(), self.to_hex())
    }
}
