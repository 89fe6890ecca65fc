//! Per-page index from normalized URL to recorded responses.

use indexmap::IndexMap;
use std::sync::Arc;
use tracetime_trace::{PageContext, ResourceRecord};
use url::Url;

/// Strip the fragment from a URL
///
/// Strings that do not parse as absolute URLs come back unchanged.
#[must_use]
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.into()
        }
        Err(_) => raw.to_string(),
    }
}

/// Recorded responses of one page, grouped by normalized URL
///
/// Each list is in recording order. Built once per page and never shared
/// across pages.
#[derive(Debug, Clone, Default)]
pub struct UrlIndex {
    by_url: IndexMap<String, Vec<Arc<ResourceRecord>>>,
}

impl UrlIndex {
    /// Index every resource of a page
    #[must_use]
    pub fn build(context: &PageContext) -> Self {
        let mut by_url: IndexMap<String, Vec<Arc<ResourceRecord>>> = IndexMap::new();
        for record in context.resources() {
            by_url
                .entry(normalize_url(&record.url))
                .or_default()
                .push(Arc::new(record.clone()));
        }

        tracing::debug!(
            page = %context.page_id,
            urls = by_url.len(),
            "built url index"
        );

        Self { by_url }
    }

    /// Recorded responses for a URL, fragment ignored
    #[must_use]
    pub fn candidates(&self, url: &str) -> &[Arc<ResourceRecord>] {
        self.by_url
            .get(&normalize_url(url))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Indexed URLs in first-seen order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.by_url.keys().map(String::as_str)
    }

    /// Number of distinct URLs
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_url.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tracetime_core::{ContentHash, FrameId, PageId, ResourceId};
    use tracetime_trace::FrameEntry;

    fn record(id: &str, url: &str) -> ResourceRecord {
        ResourceRecord {
            resource_id: ResourceId::new(id),
            url: url.to_string(),
            frame_id: FrameId::new("f"),
            content_type: String::new(),
            response_sha1: ContentHash::parse("aa").unwrap(),
            response_headers: Vec::new(),
        }
    }

    fn page(records: Vec<ResourceRecord>) -> PageContext {
        let mut frame = FrameEntry::new(FrameId::new("f"));
        frame.resources = records;
        let mut page = PageContext::new(PageId::new("p"));
        page.frames.push(frame);
        page
    }

    #[test]
    fn test_normalize_strips_fragment() {
        assert_eq!(normalize_url("https://a/x.js#frag"), "https://a/x.js");
        assert_eq!(normalize_url("https://a/x.js?q=1#f"), "https://a/x.js?q=1");
    }

    #[test]
    fn test_normalize_passes_malformed_through() {
        assert_eq!(normalize_url("not a url#frag"), "not a url#frag");
        assert_eq!(normalize_url("/relative/path#x"), "/relative/path#x");
    }

    #[test]
    fn test_candidates_grouped_in_recording_order() {
        let index = UrlIndex::build(&page(vec![
            record("r1", "https://a/x.js"),
            record("r2", "https://a/y.js"),
            record("r3", "https://a/x.js#later"),
        ]));

        let ids: Vec<&str> = index
            .candidates("https://a/x.js")
            .iter()
            .map(|r| r.resource_id.as_str())
            .collect();
        assert_eq!(ids, vec!["r1", "r3"]);
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.urls().collect::<Vec<_>>(),
            vec!["https://a/x.js", "https://a/y.js"]
        );
    }

    #[test]
    fn test_candidates_ignore_fragment() {
        let index = UrlIndex::build(&page(vec![record("r1", "https://a/x.js")]));
        assert_eq!(index.candidates("https://a/x.js#frag").len(), 1);
        assert!(index.candidates("https://a/z.js").is_empty());
    }

    #[test]
    fn test_indices_are_per_page() {
        let a = UrlIndex::build(&page(vec![record("r1", "https://a/x.js")]));
        let b = UrlIndex::build(&page(vec![]));
        assert_eq!(a.candidates("https://a/x.js").len(), 1);
        assert!(b.candidates("https://a/x.js").is_empty());
        assert!(b.is_empty());
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(
            host in "[a-z]{1,12}",
            path in "[a-z0-9/]{0,16}",
            fragment in "[a-z0-9]{0,8}",
        ) {
            let raw = format!("https://{host}.test/{path}#{fragment}");
            let once = normalize_url(&raw);
            prop_assert!(!once.contains('#'));
            prop_assert_eq!(normalize_url(&once), once.clone());
        }
    }
}
