//! Response envelopes for replayed resources.

use bytes::Bytes;
use tracetime_core::ContentHash;
use tracetime_trace::{Header, ResourceRecord};

/// Content type used when the recording has none
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Headers never replayed from the recording.
///
/// Bodies are stored decoded and whole, so the recorded encoding and framing
/// no longer describe them; the rest are re-emitted with computed values.
const REPLACED_HEADERS: &[&str] = &[
    "content-type",
    "content-encoding",
    "content-length",
    "transfer-encoding",
    "access-control-allow-origin",
];

/// A replayed response, built fresh for every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayResponse {
    /// URL the resource was recorded under
    pub url: String,
    /// Effective content type
    pub content_type: String,
    /// Headers to send, in order
    pub headers: Vec<Header>,
    /// Body bytes
    pub body: Bytes,
    /// Hash the body was read from
    pub content_hash: ContentHash,
}

impl ReplayResponse {
    /// First header with this name, case-insensitive
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.is(name))
            .map(|h| h.value.as_str())
    }

    /// Body length in bytes
    #[must_use]
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}

/// Effective content type for a recorded one
///
/// Textual types without a charset parameter get `; charset=utf-8`.
#[must_use]
pub fn content_type_for(recorded: &str) -> String {
    let recorded = recorded.trim();
    if recorded.is_empty() {
        return FALLBACK_CONTENT_TYPE.to_string();
    }

    let mut parts = recorded.split(';');
    let essence = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
    let has_charset = parts.any(|param| {
        param
            .split_once('=')
            .is_some_and(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
    });

    let textual = essence.starts_with("text/")
        || essence == "application/javascript"
        || essence == "application/json";

    if textual && !has_charset {
        format!("{}; charset=utf-8", recorded)
    } else {
        recorded.to_string()
    }
}

/// Build the response for a resolved record and its retrieved bytes
///
/// Recorded headers are replayed in order except `Content-Encoding` and
/// framing headers; `Content-Type`, `Content-Length` and
/// `Access-Control-Allow-Origin: *` are appended with computed values.
#[must_use]
pub fn assemble_response(record: &ResourceRecord, content_hash: ContentHash, body: Bytes) -> ReplayResponse {
    let content_type = content_type_for(&record.content_type);

    let mut headers: Vec<Header> = record
        .response_headers
        .iter()
        .filter(|h| !REPLACED_HEADERS.iter().any(|name| h.is(name)))
        .cloned()
        .collect();
    headers.push(Header::new("Content-Type", content_type.clone()));
    headers.push(Header::new("Content-Length", body.len().to_string()));
    headers.push(Header::new("Access-Control-Allow-Origin", "*"));

    ReplayResponse {
        url: record.url.clone(),
        content_type,
        headers,
        body,
        content_hash,
    }
}
