//! Growable output buffer for chain encoding
//!
//! ## Purpose
//!
//! The encoder never knows the final message size up front: header trailers
//! are sized as they are written and the payload can be anything from empty
//! to several megabytes. [`EnvelopeBuffer`] starts from the caller's capacity
//! hint and grows with a fixed headroom whenever the next write would not
//! fit, so a chain of small headers does not reallocate once per header.
//!
//! ## Growth Policy
//!
//! ```text
//! needed = written + next structure + payload
//! needed > capacity  →  reserve up to needed + headroom, bytes preserved
//! ```

use bytes::{Bytes, BytesMut};
use tracing::debug;

/// Owned output buffer with headroom-based growth
#[derive(Debug)]
pub struct EnvelopeBuffer {
    data: BytesMut,
    headroom: usize,
    growth_events: usize,
}

impl EnvelopeBuffer {
    pub fn with_capacity(capacity: usize, headroom: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            headroom,
            growth_events: 0,
        }
    }

    /// Makes room for `needed` total bytes, reallocating with headroom
    pub fn ensure_total(&mut self, needed: usize) {
        let capacity = self.data.capacity();
        if needed <= capacity {
            return;
        }
        let target = needed.saturating_add(self.headroom);
        self.data.reserve(target - self.data.len());
        self.growth_events += 1;
        debug!(
            written = self.data.len(),
            needed,
            old_capacity = capacity,
            new_capacity = self.data.capacity(),
            "Envelope buffer grown"
        );
    }

    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn finish(self) -> EncodedBuffer {
        EncodedBuffer {
            data: self.data,
            growth_events: self.growth_events,
        }
    }
}

/// Finished message buffer; `len` is the used length, `capacity` may be larger
#[derive(Debug, Clone)]
pub struct EncodedBuffer {
    data: BytesMut,
    growth_events: usize,
}

impl EncodedBuffer {
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// How many times the buffer had to grow past the capacity hint
    pub fn growth_events(&self) -> usize {
        self.growth_events
    }

    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data.to_vec()
    }
}

impl AsRef<[u8]> for EncodedBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl PartialEq<[u8]> for EncodedBuffer {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_slice() == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_growth_within_capacity() {
        let mut buffer = EnvelopeBuffer::with_capacity(64, 512);
        buffer.ensure_total(64);
        buffer.put_slice(&[7u8; 64]);
        let finished = buffer.finish();
        assert_eq!(finished.growth_events(), 0);
        assert_eq!(finished.len(), 64);
    }

    #[test]
    fn test_growth_preserves_written_bytes() {
        let mut buffer = EnvelopeBuffer::with_capacity(100, 512);
        buffer.put_slice(b"DLH header bytes");
        buffer.ensure_total(1000);

        assert!(buffer.capacity() >= 1000 + 512);
        assert_eq!(buffer.len(), 16);

        buffer.put_slice(&[1u8; 984]);
        let finished = buffer.finish();
        assert_eq!(finished.growth_events(), 1);
        assert_eq!(finished.len(), 1000);
        assert_eq!(&finished.as_slice()[..16], b"DLH header bytes");
        assert!(finished.as_slice()[16..].iter().all(|byte| *byte == 1));
    }

    #[test]
    fn test_zero_capacity_hint() {
        let mut buffer = EnvelopeBuffer::with_capacity(0, 0);
        buffer.ensure_total(1);
        buffer.put_slice(b"x");
        assert_eq!(buffer.finish().freeze(), Bytes::from_static(b"x"));
    }
}
