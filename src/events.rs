//! Raw filesystem events as observed by a watcher.
//! - EventType is the notification kind (created/modified/deleted/moved).
//! - FileEvent is one immutable observation; detectors only ever borrow them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Kind of filesystem notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Created,
    Modified,
    Deleted,
    Moved,
}

impl EventType {
    /// Parse the watcher's textual form (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" => Some(EventType::Created),
            "modified" => Some(EventType::Modified),
            "deleted" => Some(EventType::Deleted),
            "moved" => Some(EventType::Moved),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Created => "created",
            EventType::Modified => "modified",
            EventType::Deleted => "deleted",
            EventType::Moved => "moved",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid event type: '{s}'"))
    }
}

/// One observed filesystem notification.
///
/// `dest_path` is only meaningful for `Moved` events; a moved event without it
/// is kept as-is and simply never satisfies a rename condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEvent {
    pub event_type: EventType,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_path: Option<PathBuf>,
    pub timestamp: DateTime<Utc>,
}

impl FileEvent {
    pub fn new(
        event_type: EventType,
        path: impl Into<PathBuf>,
        dest_path: Option<PathBuf>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type,
            path: path.into(),
            dest_path,
            timestamp,
        }
    }

    pub fn created(path: impl Into<PathBuf>, timestamp: DateTime<Utc>) -> Self {
        Self::new(EventType::Created, path, None, timestamp)
    }

    pub fn modified(path: impl Into<PathBuf>, timestamp: DateTime<Utc>) -> Self {
        Self::new(EventType::Modified, path, None, timestamp)
    }

    pub fn deleted(path: impl Into<PathBuf>, timestamp: DateTime<Utc>) -> Self {
        Self::new(EventType::Deleted, path, None, timestamp)
    }

    pub fn moved(
        path: impl Into<PathBuf>,
        dest_path: impl Into<PathBuf>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(EventType::Moved, path, Some(dest_path.into()), timestamp)
    }

    #[inline]
    pub fn is(&self, event_type: EventType) -> bool {
        self.event_type == event_type
    }

    /// Destination of a move, if any.
    #[inline]
    pub fn dest(&self) -> Option<&Path> {
        self.dest_path.as_deref()
    }

    /// Lossy string form of `path`, used as the grouping key.
    pub fn path_key(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Stable chronological sort. Detectors never reorder their input, so callers
/// holding events in arrival order should run this first.
pub fn sort_chronologically(events: &mut [FileEvent]) {
    events.sort_by_key(|e| e.timestamp);
}

/// Signed elapsed time between two instants in (fractional) milliseconds.
///
/// Sub-millisecond precision is kept so that 1000.4ms does not pass a 1000ms
/// window. A span too large for microsecond arithmetic counts as infinite.
pub fn elapsed_ms(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    to.signed_duration_since(from)
        .num_microseconds()
        .map_or(f64::INFINITY, |us| us as f64 / 1_000.0)
}

/// True when `from → to` fits inside a window of `window_ms` (inclusive).
#[inline]
pub fn within_window(from: DateTime<Utc>, to: DateTime<Utc>, window_ms: u64) -> bool {
    elapsed_ms(from, to) <= window_ms as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn parse_event_types_case_insensitive() {
        assert_eq!(EventType::parse("created"), Some(EventType::Created));
        assert_eq!(EventType::parse("MODIFIED"), Some(EventType::Modified));
        assert_eq!(EventType::parse(" deleted "), Some(EventType::Deleted));
        assert_eq!(EventType::parse("Moved"), Some(EventType::Moved));
        assert_eq!(EventType::parse("renamed"), None);
        assert!("".parse::<EventType>().is_err());
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let a = t0();
        assert!(within_window(a, a + Duration::milliseconds(1000), 1000));
        assert!(!within_window(a, a + Duration::microseconds(1_000_001), 1000));
        assert!(within_window(a, a, 0));
    }

    #[test]
    fn elapsed_is_signed() {
        let a = t0();
        assert_eq!(elapsed_ms(a + Duration::milliseconds(250), a), -250.0);
    }

    #[test]
    fn sort_is_stable_for_equal_timestamps() {
        let ts = t0();
        let mut events = vec![
            FileEvent::modified("b", ts + Duration::milliseconds(5)),
            FileEvent::created("a1", ts),
            FileEvent::created("a2", ts),
        ];
        sort_chronologically(&mut events);
        let names: Vec<_> = events.iter().map(|e| e.path_key()).collect();
        assert_eq!(names, vec!["a1", "a2", "b"]);
    }

    #[test]
    fn moved_event_round_trips_through_json() {
        let ev = FileEvent::moved("/d/a.tmp", "/d/a", t0());
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"event_type\":\"moved\""));
        let back: FileEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ev);
    }
}
