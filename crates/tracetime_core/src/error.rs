//! Core error types for TRACETIME.

use crate::hash::HashError;

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Invalid encoding
    #[error("Invalid encoding: {reason}")]
    InvalidEncoding {
        /// What the decoder rejected
        reason: String,
    },

    /// Invalid content hash
    #[error("Invalid hash: {0}")]
    InvalidHash(#[from] HashError),

    /// Invalid ID format
    #[error("Invalid ID: {reason}")]
    InvalidId {
        /// Why the identifier was rejected
        reason: String,
    },

    /// Invalid timestamp
    #[error("Invalid timestamp: {reason}")]
    InvalidTimestamp {
        /// Why the timestamp was rejected
        reason: String,
    },

    /// Not found
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of entity
        kind: String,
        /// Requested identifier
        id: String,
    },
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidEncoding {
            reason: err.to_string(),
        }
    }
}
