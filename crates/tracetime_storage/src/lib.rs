//! TRACETIME Storage
//!
//! Read-only access to recorded response bodies, keyed by content hash.
//! Bodies never change for a given hash, so stores keep no cache of their own.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod store;

pub use store::{BlobSource, FsBlobStore, MemoryBlobStore, StoreConfig, StoreError, StoreResult};
