//! Recorded trace model.
//!
//! Everything here is produced once by the recorder and never mutated by
//! replay. Field names follow the recorder's camelCase JSON.

use crate::error::{TraceError, TraceResult};
use serde::{Deserialize, Serialize};
use tracetime_core::{ActionId, ContentHash, FrameId, PageId, ResourceId, SnapshotId, Timestamp};

/// One recorded response header, in recorded order and casing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header name as sent by the server
    pub name: String,
    /// Header value
    pub value: String,
}

impl Header {
    /// Create a header
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive name comparison
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// One recorded network response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    /// Globally unique resource id
    pub resource_id: ResourceId,
    /// Request URL exactly as fetched
    pub url: String,
    /// Frame that issued the request
    pub frame_id: FrameId,
    /// Recorded Content-Type (may be empty)
    #[serde(default)]
    pub content_type: String,
    /// Hash of the decoded response body
    pub response_sha1: ContentHash,
    /// Response headers
    #[serde(default)]
    pub response_headers: Vec<Header>,
}

/// Snapshot-local substitution of a URL's body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOverride {
    /// URL as referenced from the snapshot document
    pub url: String,
    /// Hash of the body that was live when the snapshot was taken
    pub sha1: ContentHash,
}

/// One captured DOM state of a frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    /// Frame the snapshot belongs to
    pub frame_id: FrameId,
    /// Snapshot id, unique within the frame
    #[serde(default)]
    pub snapshot_id: Option<SnapshotId>,
    /// Capture time
    pub timestamp: Timestamp,
    /// Serialized document
    pub html: String,
    /// Bodies that differ from the originally fetched ones
    #[serde(default)]
    pub resource_overrides: Vec<ResourceOverride>,
}

impl SnapshotRecord {
    /// Override hash recorded for exactly this URL
    #[must_use]
    pub fn override_for(&self, url: &str) -> Option<&ContentHash> {
        self.resource_overrides
            .iter()
            .find(|o| o.url == url)
            .map(|o| &o.sha1)
    }
}

/// A recorded action and the resources fetched while it ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEntry {
    /// Action id
    pub action_id: ActionId,
    /// Action name (`click`, `goto`, ...)
    #[serde(default)]
    pub name: String,
    /// Resources attributed to the action
    #[serde(default)]
    pub resources: Vec<ResourceRecord>,
}

/// A frame with its snapshots and resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameEntry {
    /// Frame id
    pub frame_id: FrameId,
    /// Snapshots, as recorded
    #[serde(default)]
    pub snapshots: Vec<SnapshotRecord>,
    /// Actions recorded in this frame
    #[serde(default)]
    pub actions: Vec<ActionEntry>,
    /// Frame-level resources
    #[serde(default)]
    pub resources: Vec<ResourceRecord>,
}

impl FrameEntry {
    /// Create an empty frame
    #[must_use]
    pub fn new(frame_id: FrameId) -> Self {
        Self {
            frame_id,
            snapshots: Vec::new(),
            actions: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Resources in recording order: action resources first, then
    /// frame-level resources
    pub fn resources_in_order(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.actions
            .iter()
            .flat_map(|action| action.resources.iter())
            .chain(self.resources.iter())
    }
}

/// A page and every frame recorded under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    /// Page id
    pub page_id: PageId,
    /// Main frame and child frames
    #[serde(default)]
    pub frames: Vec<FrameEntry>,
}

impl PageContext {
    /// Create a page with no frames
    #[must_use]
    pub fn new(page_id: PageId) -> Self {
        Self {
            page_id,
            frames: Vec::new(),
        }
    }

    /// Look up a frame of this page
    #[must_use]
    pub fn frame(&self, frame_id: &FrameId) -> Option<&FrameEntry> {
        self.frames.iter().find(|f| &f.frame_id == frame_id)
    }

    /// All resources of the page in recording order
    pub fn resources(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.frames.iter().flat_map(FrameEntry::resources_in_order)
    }

    /// Total snapshots across frames
    #[must_use]
    pub fn snapshot_count(&self) -> usize {
        self.frames.iter().map(|f| f.snapshots.len()).sum()
    }
}

/// The whole recording
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceModel {
    /// Recorded pages
    #[serde(default)]
    pub pages: Vec<PageContext>,
}

impl TraceModel {
    /// Create from pages
    #[must_use]
    pub fn new(pages: Vec<PageContext>) -> Self {
        Self { pages }
    }

    /// Parse a serialized model
    ///
    /// # Errors
    ///
    /// Returns error if the JSON does not describe a trace model
    pub fn from_json(json: &str) -> TraceResult<Self> {
        serde_json::from_str(json).map_err(|e| TraceError::Parse {
            reason: e.to_string(),
        })
    }

    /// Serialize to JSON
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_json(&self) -> TraceResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TraceError::Parse {
            reason: e.to_string(),
        })
    }

    /// Look up a page
    #[must_use]
    pub fn page(&self, page_id: &PageId) -> Option<&PageContext> {
        self.pages.iter().find(|p| &p.page_id == page_id)
    }

    /// Total resources across pages, duplicates included
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.pages.iter().map(|p| p.resources().count()).sum()
    }
}
