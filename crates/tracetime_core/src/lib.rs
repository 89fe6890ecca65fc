//! TRACETIME Core Types
//!
//! This crate contains pure types and logic with no I/O.
//! Every identifier here was computed at record time and is treated as opaque.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod hash;
pub mod id;
pub mod time;

// Re-exports
pub use error::{CoreError, CoreResult};
pub use hash::{ContentHash, HashError};
pub use id::{ActionId, FrameId, PageId, ResourceId, SnapshotId};
pub use time::Timestamp;
