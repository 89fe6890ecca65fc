//! Serving session over one loaded trace.
//!
//! All indices are built in [`ReplaySession::new`] and never mutated again,
//! so a session can be shared behind an `Arc` by any number of request tasks.
//! Only blob reads suspend.

use crate::error::{ReplayError, ReplayResult};
use crate::resolver::{ResolvedResource, resolve_resource};
use crate::resource_index::ResourceIndex;
use crate::response::{ReplayResponse, assemble_response};
use crate::selector::{TemporalCoordinate, select_in_page};
use crate::url_index::UrlIndex;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracetime_core::{ContentHash, FrameId, PageId, ResourceId, SnapshotId, Timestamp};
use tracetime_storage::BlobSource;
use tracetime_trace::{PageContext, ResourceRecord, SnapshotRecord, TraceModel};

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Title and text of the "not available" document
    pub placeholder_title: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            placeholder_title: "Snapshot not available".to_string(),
        }
    }
}

impl SessionConfig {
    /// Set the placeholder title
    #[must_use]
    pub fn with_placeholder_title(mut self, title: impl Into<String>) -> Self {
        self.placeholder_title = title.into();
        self
    }

    /// Render the placeholder document
    #[must_use]
    pub fn placeholder_html(&self) -> String {
        let title = escape_html(&self.placeholder_title);
        format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
             <body><p>{title}</p></body></html>"
        )
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Outcome of a top-level navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The selected snapshot's document
    Snapshot {
        /// Id of the selected snapshot, if recorded
        snapshot_id: Option<SnapshotId>,
        /// Capture time of the selected snapshot
        timestamp: Timestamp,
        /// Serialized document
        html: String,
    },
    /// Nothing matched; a placeholder document is shown instead
    NotAvailable {
        /// Placeholder document
        html: String,
    },
}

impl Navigation {
    /// Document to send
    #[must_use]
    pub fn html(&self) -> &str {
        match self {
            Self::Snapshot { html, .. } | Self::NotAvailable { html } => html.as_str(),
        }
    }

    /// Take the document
    #[must_use]
    pub fn into_html(self) -> String {
        match self {
            Self::Snapshot { html, .. } | Self::NotAvailable { html } => html,
        }
    }

    /// Whether a snapshot was found
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Snapshot { .. })
    }
}

#[derive(Debug)]
struct PageState {
    context: PageContext,
    url_index: UrlIndex,
}

/// Read-only replay state for one trace
pub struct ReplaySession {
    config: SessionConfig,
    resource_index: ResourceIndex,
    pages: IndexMap<PageId, PageState>,
    store: Arc<dyn BlobSource>,
}

impl std::fmt::Debug for ReplaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplaySession")
            .field("config", &self.config)
            .field("pages", &self.pages.len())
            .field("resources", &self.resource_index.len())
            .finish_non_exhaustive()
    }
}

impl ReplaySession {
    /// Build every index for a trace
    ///
    /// A page id recorded twice keeps only the later page.
    #[must_use]
    pub fn new(model: TraceModel, store: Arc<dyn BlobSource>) -> Self {
        let resource_index = ResourceIndex::build(&model);

        let mut pages = IndexMap::with_capacity(model.pages.len());
        for context in model.pages {
            let url_index = UrlIndex::build(&context);
            let page_id = context.page_id.clone();
            if pages.contains_key(&page_id) {
                tracing::warn!(page = %page_id, "duplicate page id, keeping the later page");
            }
            pages.insert(page_id, PageState { context, url_index });
        }

        tracing::info!(
            pages = pages.len(),
            resources = resource_index.len(),
            "replay session ready"
        );

        Self {
            config: SessionConfig::default(),
            resource_index,
            pages,
            store,
        }
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Recorded pages, in trace order
    pub fn pages(&self) -> impl Iterator<Item = &PageContext> {
        self.pages.values().map(|state| &state.context)
    }

    /// Look up a page
    #[must_use]
    pub fn page(&self, page_id: &PageId) -> Option<&PageContext> {
        self.pages.get(page_id).map(|state| &state.context)
    }

    /// Global resource-id index
    #[must_use]
    pub fn resource_index(&self) -> &ResourceIndex {
        &self.resource_index
    }

    /// Snapshots of a frame, as recorded
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown page or frame
    pub fn list_snapshots(&self, page_id: &PageId, frame_id: &FrameId) -> ReplayResult<&[SnapshotRecord]> {
        let page = self.page_state(page_id)?;
        page.context
            .frame(frame_id)
            .map(|frame| frame.snapshots.as_slice())
            .ok_or_else(|| ReplayError::not_found("Frame", frame_id))
    }

    /// Select the snapshot a coordinate refers to
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the page, frame or snapshot is missing
    pub fn select(
        &self,
        page_id: &PageId,
        frame_id: &FrameId,
        coordinate: &TemporalCoordinate,
    ) -> ReplayResult<&SnapshotRecord> {
        let page = self.page_state(page_id)?;
        select_in_page(&page.context, frame_id, coordinate)
    }

    /// Document for a top-level navigation
    ///
    /// Misses never fail; they produce the placeholder document.
    #[must_use]
    pub fn resolve_navigation(
        &self,
        page_id: &PageId,
        frame_id: &FrameId,
        coordinate: &TemporalCoordinate,
    ) -> Navigation {
        match self.select(page_id, frame_id, coordinate) {
            Ok(snapshot) => Navigation::Snapshot {
                snapshot_id: snapshot.snapshot_id.clone(),
                timestamp: snapshot.timestamp,
                html: snapshot.html.clone(),
            },
            Err(err) => {
                tracing::debug!(page = %page_id, frame = %frame_id, %coordinate, error = %err, "navigation not available");
                Navigation::NotAvailable {
                    html: self.config.placeholder_html(),
                }
            }
        }
    }

    /// Choose the record and hash for a sub-resource, without reading bytes
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the snapshot or a matching record is missing
    pub fn resolve(
        &self,
        page_id: &PageId,
        frame_id: &FrameId,
        coordinate: &TemporalCoordinate,
        requested_url: &str,
    ) -> ReplayResult<ResolvedResource> {
        let page = self.page_state(page_id)?;
        let snapshot = select_in_page(&page.context, frame_id, coordinate)?;
        resolve_resource(&page.url_index, snapshot, requested_url, frame_id)
            .ok_or_else(|| ReplayError::not_found("Resource", requested_url))
    }

    /// Serve a URL requested from within a snapshot
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for any miss, including a missing blob
    pub async fn resolve_sub_resource(
        &self,
        page_id: &PageId,
        frame_id: &FrameId,
        coordinate: &TemporalCoordinate,
        requested_url: &str,
    ) -> ReplayResult<ReplayResponse> {
        let resolved = self.resolve(page_id, frame_id, coordinate, requested_url)?;
        self.fetch(&resolved.record, resolved.content_hash).await
    }

    /// Serve a resource by id, optionally with a substitute body hash
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id or a missing blob
    pub async fn resolve_resource_by_id(
        &self,
        resource_id: &ResourceId,
        override_hash: Option<&ContentHash>,
    ) -> ReplayResult<ReplayResponse> {
        let record = self
            .resource_index
            .get(resource_id)
            .cloned()
            .ok_or_else(|| ReplayError::not_found("Resource", resource_id))?;
        let hash = override_hash
            .cloned()
            .unwrap_or_else(|| record.response_sha1.clone());
        self.fetch(&record, hash).await
    }

    async fn fetch(&self, record: &ResourceRecord, hash: ContentHash) -> ReplayResult<ReplayResponse> {
        match self.store.fetch_by_hash(&hash).await {
            Ok(body) => Ok(assemble_response(record, hash, body)),
            Err(err) => {
                tracing::warn!(resource = %record.resource_id, %hash, error = %err, "blob read failed");
                Err(err.into())
            }
        }
    }

    fn page_state(&self, page_id: &PageId) -> ReplayResult<&PageState> {
        self.pages
            .get(page_id)
            .ok_or_else(|| ReplayError::not_found("Page", page_id))
    }
}
