//! # Codec Configuration
//!
//! Tunables for the marshaller and the chain encoder/decoder. Defaults match
//! a little-endian queue manager and the growth policy of the C bindings.

use crate::error::ConfigError;
use byteorder::{BigEndian, ByteOrder as _, LittleEndian};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Byte order used for every integer field and length prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

impl Endianness {
    /// Reads an MQLONG; `raw` must hold at least 4 bytes
    pub(crate) fn read_i32(self, raw: &[u8]) -> i32 {
        match self {
            Endianness::Little => LittleEndian::read_i32(raw),
            Endianness::Big => BigEndian::read_i32(raw),
        }
    }

    /// Writes an MQLONG; `out` must hold at least 4 bytes
    pub(crate) fn write_i32(self, out: &mut [u8], value: i32) {
        match self {
            Endianness::Little => LittleEndian::write_i32(out, value),
            Endianness::Big => BigEndian::write_i32(out, value),
        }
    }
}

/// Codec configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Integer byte order
    pub byte_order: Endianness,

    /// Output buffer capacity when the caller passes no hint
    pub initial_capacity: usize,

    /// Extra bytes reserved whenever the output buffer has to grow
    pub growth_headroom: usize,

    /// Attach the error that ended a decode walk to the result
    pub report_decode_anomalies: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            byte_order: Endianness::Little,
            initial_capacity: 4096,      // one page covers most header chains
            growth_headroom: 512,        // same headroom as the C bindings
            report_decode_anomalies: false,
        }
    }
}

impl CodecConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a TOML file; missing keys take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_byte_order(mut self, byte_order: Endianness) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn with_anomaly_reporting(mut self, enabled: bool) -> Self {
        self.report_decode_anomalies = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CodecConfig::from_toml_str(
            r#"
            byte_order = "big"
            report_decode_anomalies = true
            "#,
        )
        .unwrap();

        assert_eq!(config.byte_order, Endianness::Big);
        assert!(config.report_decode_anomalies);
        assert_eq!(config.growth_headroom, 512);
        assert_eq!(config.initial_capacity, 4096);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = CodecConfig::from_toml_str("byte_order = \"middle\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "growth_headroom = 64").unwrap();

        let config = CodecConfig::load(file.path()).unwrap();
        assert_eq!(config.growth_headroom, 64);
        assert_eq!(config.byte_order, Endianness::Little);

        let missing = CodecConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_endianness_round_trip() {
        let mut raw = [0u8; 4];
        Endianness::Big.write_i32(&mut raw, 273);
        assert_eq!(raw, [0, 0, 1, 17]);
        assert_eq!(Endianness::Big.read_i32(&raw), 273);

        Endianness::Little.write_i32(&mut raw, -2);
        assert_eq!(raw, [0xFE, 0xFF, 0xFF, 0xFF]);
        assert_eq!(Endianness::Little.read_i32(&raw), -2);
    }
}
