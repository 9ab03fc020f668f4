//! Message envelope: descriptor, header chain and payload

use crate::header::{FormatMarker, HeaderRecord, HeaderType};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A complete message as seen by an application
///
/// `headers` are in wire order. The descriptor's `format` describes the
/// payload once the envelope is opened; chaining the markers back together
/// is the encoder's job when the envelope is sealed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub descriptor: HeaderRecord,
    pub headers: Vec<HeaderRecord>,
    pub payload: Bytes,
}

impl MessageEnvelope {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            ..Self::default()
        }
    }

    pub fn with_descriptor(mut self, descriptor: HeaderRecord) -> Self {
        self.descriptor = descriptor;
        self
    }

    pub fn with_header(mut self, header: HeaderRecord) -> Self {
        self.headers.push(header);
        self
    }

    /// Format of the payload, from the descriptor
    pub fn payload_format(&self) -> Option<FormatMarker> {
        self.descriptor.format()
    }

    /// First header of the given type, in wire order
    pub fn header(&self, header_type: HeaderType) -> Option<&HeaderRecord> {
        self.headers
            .iter()
            .find(|header| header.header_type() == Some(header_type))
    }

    /// Prepends a dead-letter header recording why and where the message
    /// was originally going
    pub fn push_dead_letter_header(
        &mut self,
        reason: i32,
        dest_q_name: &str,
        dest_q_mgr_name: &str,
    ) {
        let header = HeaderRecord::new(HeaderType::DeadLetterHeader)
            .with("reason", reason)
            .with("dest_q_name", dest_q_name)
            .with("dest_q_mgr_name", dest_q_mgr_name);
        self.headers.insert(0, header);
    }
}
