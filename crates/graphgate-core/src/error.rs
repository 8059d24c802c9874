//! Core error types.

use thiserror::Error;

use graphgate_proto::EntityId;

/// Raised once when a configuration is validated, never per query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A setting that must be positive was zero.
    #[error("{field} must be greater than 0")]
    NonPositive { field: &'static str },

    /// The default list limit exceeds the maximum.
    #[error("default limit {default} exceeds max limit {max}")]
    DefaultAboveMax { default: usize, max: usize },

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(String),

    /// The configuration document is malformed.
    #[error("invalid configuration: {0}")]
    Parse(String),
}

/// A query rejected before any resolver runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// The estimated cost is over budget.
    #[error("query complexity {score} exceeds maximum allowed complexity {max}")]
    ComplexityExceeded { score: u64, max: u64 },

    /// The selection nesting is too deep.
    #[error("query depth {depth} exceeds maximum allowed depth {max}")]
    DepthExceeded { depth: usize, max: usize },
}

/// Outcome of a failed [`crate::Loader`] load, delivered per key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The batch function returned fewer results than keys.
    #[error("batch function returned fewer results than keys")]
    BatchShortfall,

    /// The batch function reported an error for this key.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The caller's own cancellation signal fired before the value arrived.
    #[error("load cancelled")]
    Cancelled,

    /// The loader shut down before the value arrived.
    #[error("loader closed")]
    Closed,
}

/// Errors reported by a [`crate::GraphStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("node {0} not found")]
    NodeNotFound(EntityId),

    #[error("edge {0} not found")]
    EdgeNotFound(EntityId),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Errors raised while paginating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),
}

/// Core errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Admission(#[from] AdmissionError),

    #[error("load error: {0}")]
    Load(#[from] LoadError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("pagination error: {0}")]
    Pagination(#[from] PaginationError),

    #[error("value error: {0}")]
    Value(#[from] graphgate_proto::Error),
}

impl From<StorageError> for LoadError {
    fn from(err: StorageError) -> Self {
        LoadError::Fetch(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_messages_name_the_gate() {
        let err = AdmissionError::ComplexityExceeded { score: 200, max: 10 };
        assert_eq!(
            err.to_string(),
            "query complexity 200 exceeds maximum allowed complexity 10"
        );

        let err = AdmissionError::DepthExceeded { depth: 2, max: 1 };
        assert_eq!(err.to_string(), "query depth 2 exceeds maximum allowed depth 1");

        let wrapped: Error = AdmissionError::DepthExceeded { depth: 3, max: 2 }.into();
        assert!(wrapped.to_string().contains("depth"));
    }

    #[test]
    fn test_storage_error_into_load_error() {
        let err: LoadError = StorageError::NodeNotFound(9).into();
        assert_eq!(err, LoadError::Fetch("node 9 not found".into()));
    }
}
