//! MQ numeric constants used as structure defaults
//!
//! Values match the queue manager's C headers. Only the constants that appear
//! in a header default template are listed, plus the message types a
//! descriptor carries.

/// Native integer/decimal/float encoding of an x86 queue manager
pub const MQENC_NATIVE: i32 = 546;

/// Character set inherited from the preceding structure
pub const MQCCSI_INHERIT: i32 = -2;
/// Character set of the queue manager
pub const MQCCSI_Q_MGR: i32 = 0;
/// Character set not defined
pub const MQCCSI_UNDEFINED: i32 = 0;
/// UTF-8, used for RFH2 name/value folders
pub const MQCCSI_UTF8: i32 = 1208;

/// Message types
pub const MQMT_REQUEST: i32 = 1;
pub const MQMT_REPLY: i32 = 2;
pub const MQMT_REPORT: i32 = 4;
pub const MQMT_DATAGRAM: i32 = 8;

pub const MQEI_UNLIMITED: i32 = -1;
pub const MQPRI_PRIORITY_AS_Q_DEF: i32 = -1;
pub const MQPER_PERSISTENCE_AS_Q_DEF: i32 = 2;
pub const MQOL_UNDEFINED: i32 = -1;

/// CICS bridge defaults
pub const MQCUOWC_ONLY: i32 = 273;
pub const MQCGWI_DEFAULT: i32 = -2;
pub const MQCLT_PROGRAM: i32 = 1;
pub const MQCODL_AS_INPUT: i32 = -1;

/// Dead-letter reason used when no better reason is known
pub const MQRC_NONE: i32 = 0;
/// Put application type when no context was passed
pub const MQAT_NO_CONTEXT: i32 = 0;
