//! Trace loading errors.

use std::path::PathBuf;

/// Trace result type
pub type TraceResult<T> = Result<T, TraceError>;

/// Errors raised while loading a recording
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceError {
    /// Bundle directory has no manifest
    #[error("Trace manifest not found: {}", path.display())]
    MissingManifest {
        /// Expected manifest path
        path: PathBuf,
    },

    /// Filesystem error
    #[error("IO error on {}: {reason}", path.display())]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying error
        reason: String,
    },

    /// Manifest is not a valid trace model
    #[error("Failed to parse trace: {reason}")]
    Parse {
        /// Decoder message
        reason: String,
    },
}
