//! Error types for header tag and marker handling

use thiserror::Error;

/// Errors raised while interpreting header identifiers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// Header type name is not one of the known snake-case tags
    #[error("Unknown header type '{name}'")]
    UnknownHeaderName { name: String },

    /// Numeric header type id outside 0..=11
    #[error("Unknown header type id {id}")]
    UnknownHeaderId { id: u8 },
}
