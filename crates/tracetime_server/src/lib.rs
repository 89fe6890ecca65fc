//! TRACETIME Server
//!
//! HTTP surface for replaying recorded snapshots: navigation documents,
//! their sub-resources, and resources addressed by id.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod error;
pub mod handler;

pub use api::{ApiServer, ServerConfig, build_router};
pub use error::ApiError;
