//! Atomic-save detection (modularized).
//! Each submodule adds one detector to `TempPatternDetector`; this module holds
//! the shared pieces: default windows, path grouping and the detector chain.
//!
//! Detectors are pure: they borrow a chronological event slice, never reorder
//! it, and return at most one operation per call.

mod delete_temp;
mod temp_create_delete;
mod temp_modify;
mod temp_rename;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::events::FileEvent;
use crate::operation::FileOperation;
use crate::temp_names::TempNaming;

/// Default window for create-temp → rename.
pub const TEMP_RENAME_WINDOW_MS: u64 = 1000;
/// Default window for delete → create-temp → rename.
pub const DELETE_TEMP_WINDOW_MS: u64 = 1000;
/// Default window for create-temp → modify → rename.
pub const TEMP_MODIFY_WINDOW_MS: u64 = 1000;
/// Default window for create-temp → delete-temp → create-real.
pub const TEMP_CREATE_DELETE_WINDOW_MS: u64 = 5000;

/// Per-detector time windows in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionWindows {
    pub temp_rename_ms: u64,
    pub delete_temp_ms: u64,
    pub temp_modify_ms: u64,
    pub temp_create_delete_ms: u64,
}

impl Default for DetectionWindows {
    fn default() -> Self {
        Self {
            temp_rename_ms: TEMP_RENAME_WINDOW_MS,
            delete_temp_ms: DELETE_TEMP_WINDOW_MS,
            temp_modify_ms: TEMP_MODIFY_WINDOW_MS,
            temp_create_delete_ms: TEMP_CREATE_DELETE_WINDOW_MS,
        }
    }
}

/// Stateless atomic-save detector. Cheap to clone and safe to share.
#[derive(Debug, Clone, Default)]
pub struct TempPatternDetector {
    naming: TempNaming,
}

impl TempPatternDetector {
    pub fn new(naming: TempNaming) -> Self {
        Self { naming }
    }

    pub fn naming(&self) -> &TempNaming {
        &self.naming
    }

    /// Run every detector in turn and return the first match.
    ///
    /// Longer idioms are tried first: a delete → create-temp → rename triple
    /// also contains a plain create → rename pair, and reporting the pair would
    /// leave the deletion unexplained.
    pub fn detect(
        &self,
        events: &[FileEvent],
        windows: &DetectionWindows,
    ) -> Option<FileOperation> {
        self.detect_delete_temp_pattern(events, windows.delete_temp_ms)
            .or_else(|| self.detect_temp_modify_pattern(events, windows.temp_modify_ms))
            .or_else(|| self.detect_temp_rename_pattern(events, windows.temp_rename_ms))
            .or_else(|| {
                self.detect_temp_create_delete_pattern(events, windows.temp_create_delete_ms)
            })
    }

    /// Extract every atomic save from `events`.
    ///
    /// After each match the matched events are removed from the working set and
    /// detection restarts; every match consumes at least two events, so this
    /// terminates.
    pub fn detect_all(
        &self,
        events: &[FileEvent],
        windows: &DetectionWindows,
    ) -> Vec<FileOperation> {
        let mut remaining = events.to_vec();
        let mut found = Vec::new();

        while let Some(op) = self.detect(&remaining, windows) {
            for matched in &op.events {
                if let Some(pos) = remaining.iter().position(|e| e == matched) {
                    remaining.remove(pos);
                }
            }
            debug!(
                primary = %op.primary_path.display(),
                pattern = op.pattern().unwrap_or_default(),
                remaining = remaining.len(),
                "Atomic save detected"
            );
            found.push(op);
        }

        trace!(operations = found.len(), leftover = remaining.len(), "Detection pass finished");
        found
    }
}

/// Events of one path, in first-seen path order.
pub(crate) struct PathGroup<'a> {
    pub key: String,
    pub events: Vec<&'a FileEvent>,
}

/// Group events by lossy string path, keeping the order in which paths first
/// appear. Each group is stably sorted by timestamp.
pub(crate) fn group_by_path<'a, F>(events: &'a [FileEvent], mut keep: F) -> Vec<PathGroup<'a>>
where
    F: FnMut(&FileEvent) -> bool,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<PathGroup<'a>> = Vec::new();

    for event in events {
        if !keep(event) {
            continue;
        }
        let key = event.path_key();
        match index.get(&key) {
            Some(&i) => groups[i].events.push(event),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(PathGroup {
                    key,
                    events: vec![event],
                });
            }
        }
    }

    for group in &mut groups {
        group.events.sort_by_key(|e| e.timestamp);
    }
    groups
}

/// Owned, chronologically sorted copy of a merged event set.
pub(crate) fn merged_sorted(events: impl IntoIterator<Item = FileEvent>) -> Vec<FileEvent> {
    let mut merged: Vec<FileEvent> = events.into_iter().collect();
    merged.sort_by_key(|e| e.timestamp);
    merged
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    pub fn at(ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 10, 30, 0).unwrap() + Duration::milliseconds(ms)
    }
}
