//! Snapshot selection by id or by time.

use crate::error::{ReplayError, ReplayResult};
use serde::{Deserialize, Serialize};
use tracetime_core::{FrameId, SnapshotId, Timestamp};
use tracetime_trace::{FrameEntry, PageContext, SnapshotRecord};

/// Which moment of a frame to show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum TemporalCoordinate {
    /// The snapshot with this id
    Exact {
        /// Requested snapshot id
        snapshot_id: SnapshotId,
    },
    /// The latest snapshot taken at or before this time
    Before {
        /// Upper bound, inclusive
        timestamp: Timestamp,
    },
}

impl TemporalCoordinate {
    /// Exact coordinate
    #[must_use]
    pub fn exact(snapshot_id: impl Into<SnapshotId>) -> Self {
        Self::Exact {
            snapshot_id: snapshot_id.into(),
        }
    }

    /// Time-bounded coordinate
    #[must_use]
    pub fn before(timestamp: impl Into<Timestamp>) -> Self {
        Self::Before {
            timestamp: timestamp.into(),
        }
    }

    /// Build from the routing layer's `name` and `time` parameters
    ///
    /// A snapshot name outranks a time when both are given.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` if neither is usable
    pub fn from_query(name: Option<&str>, time: Option<&str>) -> ReplayResult<Self> {
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            return Ok(Self::exact(name));
        }
        match time {
            Some(time) => Ok(Self::before(Timestamp::parse(time)?)),
            None => Err(ReplayError::MalformedInput(
                "expected a snapshot name or a time".to_string(),
            )),
        }
    }
}

impl std::fmt::Display for TemporalCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact { snapshot_id } => write!(f, "name={}", snapshot_id),
            Self::Before { timestamp } => write!(f, "time<={}", timestamp),
        }
    }
}

/// Pick the snapshot of a frame that a coordinate refers to
///
/// Scans every snapshot; recorded order is not relied on. For `Before`,
/// equal timestamps resolve to the one listed last.
#[must_use]
pub fn select_snapshot<'a>(
    frame: &'a FrameEntry,
    coordinate: &TemporalCoordinate,
) -> Option<&'a SnapshotRecord> {
    match coordinate {
        TemporalCoordinate::Exact { snapshot_id } => frame
            .snapshots
            .iter()
            .find(|s| s.snapshot_id.as_ref() == Some(snapshot_id)),
        TemporalCoordinate::Before { timestamp } => {
            let mut best: Option<&SnapshotRecord> = None;
            for snapshot in &frame.snapshots {
                if snapshot.timestamp > *timestamp {
                    continue;
                }
                if best.is_none_or(|b| snapshot.timestamp >= b.timestamp) {
                    best = Some(snapshot);
                }
            }
            best
        }
    }
}

/// Find a frame of a page, then select its snapshot
///
/// # Errors
///
/// Returns `NotFound` if the frame is not part of the page or no snapshot
/// satisfies the coordinate
pub fn select_in_page<'a>(
    page: &'a PageContext,
    frame_id: &FrameId,
    coordinate: &TemporalCoordinate,
) -> ReplayResult<&'a SnapshotRecord> {
    let frame = page
        .frame(frame_id)
        .ok_or_else(|| ReplayError::not_found("Frame", frame_id))?;
    select_snapshot(frame, coordinate)
        .ok_or_else(|| ReplayError::not_found("Snapshot", format!("{} {}", frame_id, coordinate)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tracetime_core::PageId;

    fn snapshot(id: &str, ts: u32) -> SnapshotRecord {
        SnapshotRecord {
            frame_id: FrameId::new("F"),
            snapshot_id: Some(SnapshotId::new(id)),
            timestamp: Timestamp::from(ts),
            html: format!("<p>{id}</p>"),
            resource_overrides: Vec::new(),
        }
    }

    fn frame(snapshots: Vec<SnapshotRecord>) -> FrameEntry {
        let mut frame = FrameEntry::new(FrameId::new("F"));
        frame.snapshots = snapshots;
        frame
    }

    fn id_of(s: Option<&SnapshotRecord>) -> Option<&str> {
        s.and_then(|s| s.snapshot_id.as_ref()).map(SnapshotId::as_str)
    }

    #[test]
    fn test_before_picks_latest_not_after() {
        let f = frame(vec![snapshot("s1", 10), snapshot("s2", 20)]);
        assert_eq!(id_of(select_snapshot(&f, &TemporalCoordinate::before(15u32))), Some("s1"));
        assert_eq!(id_of(select_snapshot(&f, &TemporalCoordinate::before(20u32))), Some("s2"));
        assert_eq!(id_of(select_snapshot(&f, &TemporalCoordinate::before(99u32))), Some("s2"));
    }

    #[test]
    fn test_before_earlier_than_all_is_none() {
        let f = frame(vec![snapshot("s1", 10), snapshot("s2", 20)]);
        assert!(select_snapshot(&f, &TemporalCoordinate::before(9u32)).is_none());
    }

    #[test]
    fn test_exact_outranks_recency() {
        let f = frame(vec![snapshot("s1", 10), snapshot("s2", 20), snapshot("s3", 30)]);
        assert_eq!(id_of(select_snapshot(&f, &TemporalCoordinate::exact("s2"))), Some("s2"));
        assert_eq!(id_of(select_snapshot(&f, &TemporalCoordinate::exact("s1"))), Some("s1"));
        assert!(select_snapshot(&f, &TemporalCoordinate::exact("nope")).is_none());
    }

    #[test]
    fn test_before_does_not_rely_on_order() {
        let f = frame(vec![snapshot("late", 30), snapshot("early", 10), snapshot("mid", 20)]);
        assert_eq!(id_of(select_snapshot(&f, &TemporalCoordinate::before(25u32))), Some("mid"));
    }

    #[test]
    fn test_before_equal_timestamps_last_listed_wins() {
        let f = frame(vec![snapshot("a", 10), snapshot("b", 10)]);
        assert_eq!(id_of(select_snapshot(&f, &TemporalCoordinate::before(10u32))), Some("b"));
    }

    #[test]
    fn test_before_negative_zero_includes_zero() {
        let f = frame(vec![snapshot("s0", 0)]);
        let coordinate = TemporalCoordinate::from_query(None, Some("-0")).unwrap();
        assert_eq!(id_of(select_snapshot(&f, &coordinate)), Some("s0"));
    }

    #[test]
    fn test_from_query() {
        assert_eq!(
            TemporalCoordinate::from_query(Some("s2"), None).unwrap(),
            TemporalCoordinate::exact("s2")
        );
        assert_eq!(
            TemporalCoordinate::from_query(None, Some("15")).unwrap(),
            TemporalCoordinate::before(15u32)
        );
        // Name outranks time.
        assert_eq!(
            TemporalCoordinate::from_query(Some("s2"), Some("15")).unwrap(),
            TemporalCoordinate::exact("s2")
        );
        assert!(matches!(
            TemporalCoordinate::from_query(None, Some("later")),
            Err(ReplayError::MalformedInput(_))
        ));
        assert!(matches!(
            TemporalCoordinate::from_query(Some(""), None),
            Err(ReplayError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_select_in_page_missing_frame() {
        let mut page = PageContext::new(PageId::new("p"));
        page.frames.push(frame(vec![snapshot("s1", 10)]));

        let err = select_in_page(&page, &FrameId::new("other"), &TemporalCoordinate::before(10u32))
            .unwrap_err();
        assert!(matches!(err, ReplayError::NotFound { kind: "Frame", .. }));

        let err = select_in_page(&page, &FrameId::new("F"), &TemporalCoordinate::before(1u32))
            .unwrap_err();
        assert!(matches!(err, ReplayError::NotFound { kind: "Snapshot", .. }));

        let found = select_in_page(&page, &FrameId::new("F"), &TemporalCoordinate::exact("s1"));
        assert!(found.is_ok());
    }

    proptest! {
        #[test]
        fn prop_before_returns_maximal_bounded(
            times in proptest::collection::vec(0u32..1000, 1..20),
            bound in 0u32..1100,
        ) {
            let snapshots: Vec<SnapshotRecord> = times
                .iter()
                .enumerate()
                .map(|(i, t)| snapshot(&format!("s{i}"), *t))
                .collect();
            let f = frame(snapshots);
            let selected = select_snapshot(&f, &TemporalCoordinate::before(bound));

            let best = times.iter().copied().filter(|t| *t <= bound).max();
            match (selected, best) {
                (None, None) => {}
                (Some(s), Some(t)) => prop_assert_eq!(s.timestamp, Timestamp::from(t)),
                (s, b) => prop_assert!(false, "selected {:?}, expected {:?}", s.map(|s| s.timestamp), b),
            }
        }

        #[test]
        fn prop_exact_always_found(
            times in proptest::collection::vec(0u32..1000, 1..20),
            pick in 0usize..20,
        ) {
            let pick = pick % times.len();
            let snapshots: Vec<SnapshotRecord> = times
                .iter()
                .enumerate()
                .map(|(i, t)| snapshot(&format!("s{i}"), *t))
                .collect();
            let f = frame(snapshots);
            let id = format!("s{pick}");
            let selected = select_snapshot(&f, &TemporalCoordinate::exact(id.as_str()));
            prop_assert_eq!(id_of(selected), Some(id.as_str()));
        }
    }
}
