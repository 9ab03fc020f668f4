//! Codecs for the variable trailers of MQRFH and MQRFH2
//!
//! Both are sequences of 4-byte length prefixes followed by data, written in
//! the configured byte order. Malformed tails never fail a decode: parsing
//! stops, keeps what it has, and logs a warning.

use crate::config::Endianness;
use mq_types::NameValueMap;
use tracing::warn;

const LENGTH_PREFIX: usize = 4;

fn pad_to_word(out: &mut Vec<u8>, fill: u8) {
    let padding = (LENGTH_PREFIX - out.len() % LENGTH_PREFIX) % LENGTH_PREFIX;
    out.resize(out.len() + padding, fill);
}

fn push_length(out: &mut Vec<u8>, length: usize, byte_order: Endianness) {
    let mut prefix = [0u8; LENGTH_PREFIX];
    byte_order.write_i32(&mut prefix, i32::try_from(length).unwrap_or(i32::MAX));
    out.extend_from_slice(&prefix);
}

/// Reads one length-prefixed item, `None` when the prefix or data runs past
/// the region or the length is negative
fn take_item<'a>(region: &'a [u8], pos: &mut usize, byte_order: Endianness) -> Option<&'a [u8]> {
    let prefix = region.get(*pos..*pos + LENGTH_PREFIX)?;
    let length = usize::try_from(byte_order.read_i32(prefix)).ok()?;
    let start = *pos + LENGTH_PREFIX;
    let item = region.get(start..start.checked_add(length)?)?;
    *pos = start + length;
    Some(item)
}

/// Name/value pairs in insertion order, list values repeated under their
/// name, NUL-padded to a 4-byte multiple
pub(crate) fn encode_name_values(map: &NameValueMap, byte_order: Endianness) -> Vec<u8> {
    let mut out = Vec::new();
    for (name, value) in map.pairs() {
        push_length(&mut out, name.len(), byte_order);
        out.extend_from_slice(name.as_bytes());
        push_length(&mut out, value.len(), byte_order);
        out.extend_from_slice(value.as_bytes());
    }
    pad_to_word(&mut out, 0);
    out
}

/// Inverse of [`encode_name_values`]; repeated names coalesce into a list
pub(crate) fn decode_name_values(region: &[u8], byte_order: Endianness) -> NameValueMap {
    let mut map = NameValueMap::new();
    let mut pos = 0;
    while pos < region.len() {
        let rest = &region[pos..];
        // a pair needs two prefixes; anything shorter is word padding
        if rest.len() < 2 * LENGTH_PREFIX {
            if rest.iter().any(|byte| *byte != 0 && *byte != b' ') {
                warn!(
                    offset = pos,
                    remaining = rest.len(),
                    "Trailing bytes after name/value pairs ignored"
                );
            }
            break;
        }
        let Some(name) = take_item(region, &mut pos, byte_order) else {
            warn!(
                offset = pos,
                pairs = map.len(),
                "Malformed name length, name/value parsing stopped"
            );
            break;
        };
        let Some(value) = take_item(region, &mut pos, byte_order) else {
            warn!(
                offset = pos,
                pairs = map.len(),
                "Malformed value length, name/value parsing stopped"
            );
            break;
        };
        map.append(
            String::from_utf8_lossy(name).into_owned(),
            String::from_utf8_lossy(value).into_owned(),
        );
    }
    map
}

/// Each string prefixed with its padded length and space-padded to 4 bytes
pub(crate) fn encode_padded_strings(items: &[String], byte_order: Endianness) -> Vec<u8> {
    let mut out = Vec::new();
    for item in items {
        let padded = item.len().div_ceil(LENGTH_PREFIX) * LENGTH_PREFIX;
        push_length(&mut out, padded, byte_order);
        out.extend_from_slice(item.as_bytes());
        out.resize(out.len() + padded - item.len(), b' ');
    }
    out
}

/// Inverse of [`encode_padded_strings`], trailing pad spaces stripped
pub(crate) fn decode_padded_strings(region: &[u8], byte_order: Endianness) -> Vec<String> {
    let mut items = Vec::new();
    let mut pos = 0;
    while region.len() - pos >= LENGTH_PREFIX {
        let Some(item) = take_item(region, &mut pos, byte_order) else {
            warn!(
                offset = pos,
                items = items.len(),
                "Malformed folder length, RFH2 parsing stopped"
            );
            break;
        };
        let text = String::from_utf8_lossy(item);
        items.push(text.trim_end_matches(' ').to_string());
    }
    items
}
