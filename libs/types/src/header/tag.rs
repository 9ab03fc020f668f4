//! Header type tags
//!
//! [`HeaderType`] is the closed set of structures the codec understands.
//! [`HeaderTag`] is what a record actually carries: usually a known type, but a
//! record built from an arbitrary name stays representable so the encoder can
//! reject it with a proper error instead of the caller failing earlier.

use crate::errors::TypesError;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every structure kind that can appear in or alongside a header chain
#[repr(u8)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    TryFromPrimitive,
    IntoPrimitive,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HeaderType {
    /// MQMD, the per-message descriptor. Never part of a chain walk
    MessageDescriptor = 0,
    /// MQDLH
    DeadLetterHeader = 1,
    /// MQDH, variable length
    DistHeader = 2,
    /// MQCIH
    Cics = 3,
    /// MQIIH
    Ims = 4,
    /// MQRFH, variable length with a name/value trailer
    RfHeader = 5,
    /// MQRFH2, variable length with a list of folders
    #[serde(rename = "rf_header_2")]
    RfHeader2 = 6,
    /// MQRMH, variable length
    RefMsgHeader = 7,
    /// MQTM; ends the chain
    Trigger = 8,
    /// MQTMC2, the character form handed to triggered applications
    TriggerCharacter = 9,
    /// MQWIH
    WorkInfoHeader = 10,
    /// MQXQH; ends the chain
    XmitQHeader = 11,
}

impl HeaderType {
    pub const ALL: [HeaderType; 12] = [
        HeaderType::MessageDescriptor,
        HeaderType::DeadLetterHeader,
        HeaderType::DistHeader,
        HeaderType::Cics,
        HeaderType::Ims,
        HeaderType::RfHeader,
        HeaderType::RfHeader2,
        HeaderType::RefMsgHeader,
        HeaderType::Trigger,
        HeaderType::TriggerCharacter,
        HeaderType::WorkInfoHeader,
        HeaderType::XmitQHeader,
    ];

    /// Stable snake-case name
    pub const fn name(self) -> &'static str {
        match self {
            HeaderType::MessageDescriptor => "message_descriptor",
            HeaderType::DeadLetterHeader => "dead_letter_header",
            HeaderType::DistHeader => "dist_header",
            HeaderType::Cics => "cics",
            HeaderType::Ims => "ims",
            HeaderType::RfHeader => "rf_header",
            HeaderType::RfHeader2 => "rf_header_2",
            HeaderType::RefMsgHeader => "ref_msg_header",
            HeaderType::Trigger => "trigger",
            HeaderType::TriggerCharacter => "trigger_character",
            HeaderType::WorkInfoHeader => "work_info_header",
            HeaderType::XmitQHeader => "xmit_q_header",
        }
    }

    /// Numeric id, stable across releases
    pub fn id(self) -> u8 {
        self.into()
    }

    pub fn from_id(id: u8) -> Result<Self, TypesError> {
        Self::try_from(id).map_err(|_| TypesError::UnknownHeaderId { id })
    }
}

impl FromStr for HeaderType {
    type Err = TypesError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|header_type| header_type.name() == name)
            .ok_or_else(|| TypesError::UnknownHeaderName {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for HeaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tag carried by a header record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderTag {
    Known(HeaderType),
    /// A name no [`HeaderType`] answers to
    Other(String),
}

impl HeaderTag {
    /// Resolves a name, keeping unrecognized names as [`HeaderTag::Other`]
    pub fn parse(name: &str) -> Self {
        match name.parse::<HeaderType>() {
            Ok(header_type) => HeaderTag::Known(header_type),
            Err(_) => HeaderTag::Other(name.to_string()),
        }
    }

    pub fn header_type(&self) -> Option<HeaderType> {
        match self {
            HeaderTag::Known(header_type) => Some(*header_type),
            HeaderTag::Other(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            HeaderTag::Known(header_type) => header_type.name(),
            HeaderTag::Other(name) => name,
        }
    }
}

impl From<HeaderType> for HeaderTag {
    fn from(header_type: HeaderType) -> Self {
        HeaderTag::Known(header_type)
    }
}

impl From<&str> for HeaderTag {
    fn from(name: &str) -> Self {
        HeaderTag::parse(name)
    }
}

impl fmt::Display for HeaderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
