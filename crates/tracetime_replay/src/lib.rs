//! TRACETIME Replay
//!
//! Resolution of recorded snapshots and their sub-resources.
//! Given a page, a frame and a moment in time, picks the document that was
//! live and serves every URL it references from the bytes that were live
//! alongside it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod error;
pub mod resolver;
pub mod resource_index;
pub mod response;
pub mod selector;
pub mod session;
pub mod url_index;

pub use address::{resource_url, snapshot_url, sub_resource_url};
pub use error::{ReplayError, ReplayResult};
pub use resolver::{ResolvedResource, resolve_resource};
pub use resource_index::ResourceIndex;
pub use response::{ReplayResponse, assemble_response, content_type_for};
pub use selector::{TemporalCoordinate, select_in_page, select_snapshot};
pub use session::{Navigation, ReplaySession, SessionConfig};
pub use url_index::{UrlIndex, normalize_url};
