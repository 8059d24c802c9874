//! Shared error types.

use thiserror::Error;

/// Errors raised by the shared value types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A typed accessor was used on a value carrying a different tag.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A value could not be interpreted.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl Error {
    pub(crate) fn type_mismatch(expected: &'static str, actual: &'static str) -> Self {
        Error::TypeMismatch { expected, actual }
    }
}
