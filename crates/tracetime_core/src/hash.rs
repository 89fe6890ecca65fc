//! Content hashes for addressing recorded response bodies.
//!
//! A recorder names every response body after the SHA-1 digest of its
//! decoded bytes, optionally followed by a file extension
//! (`3f786850e387550fdab836ed7e6dc881de23001b.css`). The hash is the blob
//! store key, so it is validated once here and never needs re-checking by
//! the store: it can not contain path separators or parent references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated content hash naming one immutable blob
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    /// Parse and validate a content hash
    ///
    /// # Errors
    ///
    /// Returns error if the digest is not hex, the extension is not
    /// alphanumeric, or the value could escape the store root
    pub fn parse(value: &str) -> Result<Self, HashError> {
        if value.is_empty() {
            return Err(HashError::Empty);
        }
        if value.contains('/') || value.contains('\\') || value.contains("..") {
            return Err(HashError::InvalidPath(value.to_string()));
        }

        let (digest, extension) = match value.split_once('.') {
            Some((digest, extension)) => (digest, Some(extension)),
            None => (value, None),
        };

        if digest.is_empty() || hex::decode(digest).is_err() {
            return Err(HashError::InvalidHex(digest.to_string()));
        }
        // Multi-part extensions (`tar.gz`) are dot-separated alphanumeric segments.
        if let Some(extension) = extension {
            let valid = extension.split('.').all(|segment| {
                !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphanumeric())
            });
            if !valid {
                return Err(HashError::InvalidExtension(extension.to_string()));
            }
        }

        Ok(Self(value.to_string()))
    }

    /// Full hash string, usable as a file name
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex digest without the extension
    #[must_use]
    pub fn digest(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(d, _)| d)
    }

    /// File extension, if the recorder attached one
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.0.split_once('.').map(|(_, ext)| ext)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContentHash {
    type Error = HashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

impl std::str::FromStr for ContentHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Hash-related errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    /// Empty hash
    #[error("content hash is empty")]
    Empty,
    /// Digest part is not hex
    #[error("invalid hex digest: {0}")]
    InvalidHex(String),
    /// Extension contains unexpected characters
    #[error("invalid extension: {0}")]
    InvalidExtension(String),
    /// Value would escape the blob store root
    #[error("hash is not a plain file name: {0}")]
    InvalidPath(String),
}
