//! Resolution of a requested URL to one recorded response body.

use crate::url_index::UrlIndex;
use std::sync::Arc;
use tracetime_core::{ContentHash, FrameId};
use tracetime_trace::{ResourceRecord, SnapshotRecord};

/// A recorded response chosen for a request, with the hash to serve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    /// Record supplying metadata (content type, headers)
    pub record: Arc<ResourceRecord>,
    /// Hash of the bytes to serve
    pub content_hash: ContentHash,
    /// Whether the snapshot substituted the body
    pub overridden: bool,
}

/// Pick the recorded response for a URL requested from a snapshot
///
/// Candidates recorded in the requesting frame win; the last such candidate
/// in recording order is taken. With no same-frame candidate, the last
/// candidate in recording order is taken regardless of frame. A snapshot
/// override registered for the exact requested URL (fragment included)
/// replaces the body hash but not the metadata.
#[must_use]
pub fn resolve_resource(
    index: &UrlIndex,
    snapshot: &SnapshotRecord,
    requested_url: &str,
    requested_frame: &FrameId,
) -> Option<ResolvedResource> {
    let candidates = index.candidates(requested_url);
    let record = candidates
        .iter()
        .rev()
        .find(|r| &r.frame_id == requested_frame)
        .or_else(|| candidates.last())?;

    let (content_hash, overridden) = match snapshot.override_for(requested_url) {
        Some(hash) => (hash.clone(), true),
        None => (record.response_sha1.clone(), false),
    };

    tracing::debug!(
        url = requested_url,
        resource = %record.resource_id,
        candidates = candidates.len(),
        same_frame = record.frame_id == *requested_frame,
        overridden,
        "resolved resource"
    );

    Some(ResolvedResource {
        record: Arc::clone(record),
        content_hash,
        overridden,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracetime_core::{PageId, ResourceId, SnapshotId, Timestamp};
    use tracetime_trace::{FrameEntry, PageContext, ResourceOverride};

    fn record(id: &str, url: &str, frame: &str, sha: &str) -> ResourceRecord {
        ResourceRecord {
            resource_id: ResourceId::new(id),
            url: url.to_string(),
            frame_id: FrameId::new(frame),
            content_type: "application/javascript".to_string(),
            response_sha1: ContentHash::parse(sha).unwrap(),
            response_headers: Vec::new(),
        }
    }

    fn index(records: Vec<ResourceRecord>) -> UrlIndex {
        let mut frame = FrameEntry::new(FrameId::new("main"));
        frame.resources = records;
        let mut page = PageContext::new(PageId::new("p"));
        page.frames.push(frame);
        UrlIndex::build(&page)
    }

    fn snapshot(overrides: Vec<(&str, &str)>) -> SnapshotRecord {
        SnapshotRecord {
            frame_id: FrameId::new("main"),
            snapshot_id: Some(SnapshotId::new("s1")),
            timestamp: Timestamp::from(10u32),
            html: String::new(),
            resource_overrides: overrides
                .into_iter()
                .map(|(url, sha)| ResourceOverride {
                    url: url.to_string(),
                    sha1: ContentHash::parse(sha).unwrap(),
                })
                .collect(),
        }
    }

    fn resolve(index: &UrlIndex, snap: &SnapshotRecord, url: &str, frame: &str) -> Option<ResolvedResource> {
        resolve_resource(index, snap, url, &FrameId::new(frame))
    }

    #[test]
    fn test_fragment_is_stripped() {
        let idx = index(vec![record("r1", "https://a/x.js", "main", "aa")]);
        let resolved = resolve(&idx, &snapshot(vec![]), "https://a/x.js#frag", "main").unwrap();
        assert_eq!(resolved.record.resource_id.as_str(), "r1");
        assert_eq!(resolved.content_hash.as_str(), "aa");
        assert!(!resolved.overridden);
    }

    #[test]
    fn test_unknown_url_is_none() {
        let idx = index(vec![record("r1", "https://a/x.js", "main", "aa")]);
        assert!(resolve(&idx, &snapshot(vec![]), "https://a/y.js", "main").is_none());
    }

    #[test]
    fn test_prefers_requesting_frame() {
        let idx = index(vec![
            record("r1", "https://a/x.js", "main", "aa"),
            record("r2", "https://a/x.js", "child", "bb"),
        ]);
        let snap = snapshot(vec![]);
        assert_eq!(
            resolve(&idx, &snap, "https://a/x.js", "main").unwrap().record.resource_id.as_str(),
            "r1"
        );
        assert_eq!(
            resolve(&idx, &snap, "https://a/x.js", "child").unwrap().record.resource_id.as_str(),
            "r2"
        );
    }

    #[test]
    fn test_same_frame_ties_take_last_recorded() {
        let idx = index(vec![
            record("r1", "https://a/x.js", "main", "aa"),
            record("r2", "https://a/x.js", "main", "bb"),
            record("r3", "https://a/x.js", "child", "cc"),
        ]);
        let resolved = resolve(&idx, &snapshot(vec![]), "https://a/x.js", "main").unwrap();
        assert_eq!(resolved.record.resource_id.as_str(), "r2");
    }

    #[test]
    fn test_falls_back_to_last_candidate() {
        let idx = index(vec![
            record("r1", "https://a/x.js", "child", "aa"),
            record("r2", "https://a/x.js", "other", "bb"),
        ]);
        let resolved = resolve(&idx, &snapshot(vec![]), "https://a/x.js", "main").unwrap();
        assert_eq!(resolved.record.resource_id.as_str(), "r2");
    }

    #[test]
    fn test_override_replaces_hash_only() {
        let idx = index(vec![record("r1", "https://a/x.js", "main", "aa")]);
        let snap = snapshot(vec![("https://a/x.js", "ff")]);
        let resolved = resolve(&idx, &snap, "https://a/x.js", "main").unwrap();
        assert_eq!(resolved.record.resource_id.as_str(), "r1");
        assert_eq!(resolved.record.content_type, "application/javascript");
        assert_eq!(resolved.content_hash.as_str(), "ff");
        assert!(resolved.overridden);
    }

    #[test]
    fn test_override_matches_original_url() {
        let idx = index(vec![record("r1", "https://a/x.js", "main", "aa")]);
        let snap = snapshot(vec![("https://a/x.js", "ff")]);
        // The override is keyed by the exact URL, fragment included.
        let resolved = resolve(&idx, &snap, "https://a/x.js#frag", "main").unwrap();
        assert_eq!(resolved.content_hash.as_str(), "aa");
        assert!(!resolved.overridden);
    }
}
