//! TRACETIME Trace Model
//!
//! The read-only structure a recorder leaves behind: pages, their frames,
//! each frame's snapshots, and every network response fetched along the way.
//! Bundles on disk are a `trace.json` manifest plus a `resources/` blob
//! directory.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bundle;
pub mod error;
pub mod model;

pub use bundle::TraceBundle;
pub use error::{TraceError, TraceResult};
pub use model::{
    ActionEntry, FrameEntry, Header, PageContext, ResourceOverride, ResourceRecord,
    SnapshotRecord, TraceModel,
};
