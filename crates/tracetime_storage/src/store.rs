//! Content-addressed blob stores.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracetime_core::ContentHash;

/// Store result type
pub type StoreResult<T> = Result<T, StoreError>;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one file per content hash
    pub root: PathBuf,
    /// Maximum blob size served, in bytes (0 = unlimited)
    pub max_blob_size: u64,
}

impl StoreConfig {
    /// Create a config rooted at a directory
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Set the maximum blob size
    #[must_use]
    pub fn with_max_blob_size(mut self, limit: u64) -> Self {
        self.max_blob_size = limit;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("resources"),
            max_blob_size: 100 * 1024 * 1024, // 100 MB
        }
    }
}

/// Store error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Blob not found
    #[error("Blob not found: {hash}")]
    NotFound {
        /// Requested hash
        hash: ContentHash,
    },
    /// Blob exceeds the configured limit
    #[error("Blob too large: {size} bytes (limit: {limit})")]
    BlobTooLarge {
        /// Blob size
        size: u64,
        /// Configured limit
        limit: u64,
    },
    /// IO error
    #[error("IO error reading {hash}: {reason}")]
    Io {
        /// Requested hash
        hash: ContentHash,
        /// Underlying error
        reason: String,
    },
}

/// Capability to fetch immutable bytes by content hash
#[async_trait]
pub trait BlobSource: Send + Sync {
    /// Fetch the bytes stored under a hash
    ///
    /// # Errors
    ///
    /// Returns error if the blob is missing or can not be read
    async fn fetch_by_hash(&self, hash: &ContentHash) -> StoreResult<Bytes>;
}

/// In-memory blob store
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<ContentHash, Bytes>>,
}

impl MemoryBlobStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a blob under a hash
    ///
    /// The hash is taken as given; recorders name blobs, this store does
    /// not recompute digests.
    pub fn insert(&self, hash: ContentHash, data: impl Into<Bytes>) {
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(hash, data.into());
    }

    /// Builder-style insert
    #[must_use]
    pub fn with_blob(self, hash: ContentHash, data: impl Into<Bytes>) -> Self {
        self.insert(hash, data);
        self
    }

    /// Check if a blob exists
    #[must_use]
    pub fn contains(&self, hash: &ContentHash) -> bool {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(hash)
    }

    /// Number of blobs
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobSource for MemoryBlobStore {
    async fn fetch_by_hash(&self, hash: &ContentHash) -> StoreResult<Bytes> {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(hash)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { hash: hash.clone() })
    }
}

/// Blob store backed by a directory of one file per hash
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    config: StoreConfig,
}

impl FsBlobStore {
    /// Create a store over a directory
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(StoreConfig::new(root))
    }

    /// Create with custom configuration
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Store root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Get blob file path
    #[must_use]
    pub fn blob_path(&self, hash: &ContentHash) -> PathBuf {
        self.config.root.join(hash.as_str())
    }
}

#[async_trait]
impl BlobSource for FsBlobStore {
    async fn fetch_by_hash(&self, hash: &ContentHash) -> StoreResult<Bytes> {
        let path = self.blob_path(hash);
        let io_error = |e: std::io::Error| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound { hash: hash.clone() }
            } else {
                StoreError::Io {
                    hash: hash.clone(),
                    reason: e.to_string(),
                }
            }
        };

        let metadata = tokio::fs::metadata(&path).await.map_err(io_error)?;
        if !metadata.is_file() {
            return Err(StoreError::NotFound { hash: hash.clone() });
        }
        let limit = self.config.max_blob_size;
        if limit > 0 && metadata.len() > limit {
            return Err(StoreError::BlobTooLarge {
                size: metadata.len(),
                limit,
            });
        }

        let data = tokio::fs::read(&path).await.map_err(io_error)?;
        tracing::trace!(%hash, bytes = data.len(), "read blob");
        Ok(Bytes::from(data))
    }
}
