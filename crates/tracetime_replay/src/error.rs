//! Replay errors.
//!
//! None of these are fatal. Navigation misses become a placeholder document,
//! everything else becomes a plain not-found for the caller.

use tracetime_core::CoreError;
use tracetime_storage::StoreError;

/// Replay result type
pub type ReplayResult<T> = Result<T, ReplayError>;

/// Replay error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    /// No matching page, frame, snapshot, resource, or blob
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of entity
        kind: &'static str,
        /// Requested identifier
        id: String,
    },

    /// Unparseable coordinate, hash, or URL
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Blob store could not produce the bytes
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ReplayError {
    /// Whether the caller should answer with a plain not-found
    ///
    /// Holds for every variant: malformed input and store failures are
    /// answered exactly like a miss.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::MalformedInput(_) | Self::StoreUnavailable(_) => true,
        }
    }

    pub(crate) fn not_found(kind: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for ReplayError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { hash } => Self::not_found("Blob", hash),
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<CoreError> for ReplayError {
    fn from(err: CoreError) -> Self {
        Self::MalformedInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracetime_core::ContentHash;

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let hash = ContentHash::parse("abcd").unwrap();
        let err: ReplayError = StoreError::NotFound { hash }.into();
        assert_eq!(err, ReplayError::not_found("Blob", "abcd"));
        assert_eq!(err.to_string(), "Blob not found: abcd");
    }

    #[test]
    fn test_store_io_maps_to_unavailable() {
        let err: ReplayError = StoreError::BlobTooLarge { size: 2, limit: 1 }.into();
        assert!(matches!(err, ReplayError::StoreUnavailable(_)));
    }

    #[test]
    fn test_is_not_found_covers_taxonomy() {
        assert!(ReplayError::not_found("Frame", "f").is_not_found());
        assert!(ReplayError::MalformedInput("time=soon".to_string()).is_not_found());
        assert!(ReplayError::StoreUnavailable("disk".to_string()).is_not_found());
        let err: ReplayError = StoreError::BlobTooLarge { size: 2, limit: 1 }.into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_core_error_maps_to_malformed() {
        let err: ReplayError = CoreError::InvalidTimestamp {
            reason: "x".to_string(),
        }
        .into();
        assert!(matches!(err, ReplayError::MalformedInput(_)));
    }
}
