//! Header chain vocabulary: tags, markers, values and records

pub mod format;
pub mod record;
pub mod tag;
pub mod value;

pub use format::{FormatMarker, StrucId, FORMAT_MARKER_LEN, STRUC_ID_LEN};
pub use record::{FieldMap, HeaderRecord, FORMAT_FIELD};
pub use tag::{HeaderTag, HeaderType};
pub use value::{FieldValue, NameValue, NameValueMap};
