//! Addresses for snapshots and resources.
//!
//! These strings end up in generated hyperlinks, so the HTTP routes must
//! accept exactly what is built here.

use crate::selector::TemporalCoordinate;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracetime_core::{ContentHash, FrameId, PageId, ResourceId};

/// Everything except RFC 3986 unreserved characters
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

fn coordinate_query(coordinate: &TemporalCoordinate) -> String {
    match coordinate {
        TemporalCoordinate::Exact { snapshot_id } => format!("name={}", encode(snapshot_id.as_str())),
        TemporalCoordinate::Before { timestamp } => format!("time={}", encode(&timestamp.to_string())),
    }
}

/// `/snapshot/{page}/{frame}?name=...` or `?time=...`
#[must_use]
pub fn snapshot_url(page_id: &PageId, frame_id: &FrameId, coordinate: &TemporalCoordinate) -> String {
    format!(
        "/snapshot/{}/{}?{}",
        encode(page_id.as_str()),
        encode(frame_id.as_str()),
        coordinate_query(coordinate)
    )
}

/// `/snapshot/{page}/{frame}/resource?name=...&url=...`
#[must_use]
pub fn sub_resource_url(
    page_id: &PageId,
    frame_id: &FrameId,
    coordinate: &TemporalCoordinate,
    requested_url: &str,
) -> String {
    format!(
        "/snapshot/{}/{}/resource?{}&url={}",
        encode(page_id.as_str()),
        encode(frame_id.as_str()),
        coordinate_query(coordinate),
        encode(requested_url)
    )
}

/// `/resource/{id}`, with `?sha1=` when a substitute body is wanted
#[must_use]
pub fn resource_url(resource_id: &ResourceId, override_hash: Option<&ContentHash>) -> String {
    let path = format!("/resource/{}", encode(resource_id.as_str()));
    match override_hash {
        Some(hash) => format!("{}?sha1={}", path, encode(hash.as_str())),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;

    #[test]
    fn test_snapshot_url() {
        let url = snapshot_url(
            &PageId::new("page@1"),
            &FrameId::new("frame@2"),
            &TemporalCoordinate::exact("snap-3"),
        );
        assert_eq!(url, "/snapshot/page%401/frame%402?name=snap-3");

        let url = snapshot_url(
            &PageId::new("p"),
            &FrameId::new("f"),
            &TemporalCoordinate::before(1500u32),
        );
        assert_eq!(url, "/snapshot/p/f?time=1500");
    }

    #[test]
    fn test_sub_resource_url_encodes_requested_url() {
        let url = sub_resource_url(
            &PageId::new("p"),
            &FrameId::new("f"),
            &TemporalCoordinate::exact("s1"),
            "https://a.test/x.css?v=1&w=2#frag",
        );
        assert_eq!(
            url,
            "/snapshot/p/f/resource?name=s1&url=https%3A%2F%2Fa.test%2Fx.css%3Fv%3D1%26w%3D2%23frag"
        );
        let encoded = url.rsplit_once("url=").unwrap().1;
        assert_eq!(
            percent_decode_str(encoded).decode_utf8().unwrap(),
            "https://a.test/x.css?v=1&w=2#frag"
        );
    }

    #[test]
    fn test_resource_url() {
        let id = ResourceId::new("r/1");
        assert_eq!(resource_url(&id, None), "/resource/r%2F1");
        let hash = ContentHash::parse("abcd.png").unwrap();
        assert_eq!(resource_url(&id, Some(&hash)), "/resource/r%2F1?sha1=abcd.png");
    }
}
