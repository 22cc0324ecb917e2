//! create-temp → modify-temp(s) → rename-temp-to-final.
//!
//! Unlike the adjacent-pair detectors this one groups events per temp path, so
//! unrelated events interleaved with the write do not break the match.

use tracing::trace;

use super::{TempPatternDetector, group_by_path, merged_sorted};
use crate::events::{EventType, FileEvent, within_window};
use crate::operation::{FileOperation, SavePattern};

impl TempPatternDetector {
    pub fn detect_temp_modify_pattern(
        &self,
        events: &[FileEvent],
        temp_window_ms: u64,
    ) -> Option<FileOperation> {
        if events.len() < 3 {
            return None;
        }

        let temp_groups = group_by_path(events, |e| self.naming().is_temp_file(&e.path));

        for group in temp_groups.iter().filter(|g| g.events.len() >= 2) {
            let written = group.events[0].is(EventType::Created)
                && group.events[1..].iter().any(|e| e.is(EventType::Modified));
            if !written {
                continue;
            }

            // The rename is searched in the whole input, not just the group.
            let Some(move_event) = events
                .iter()
                .find(|e| e.is(EventType::Moved) && e.path_key() == group.key)
            else {
                continue;
            };

            let mut combined: Vec<FileEvent> = group.events.iter().map(|e| (*e).clone()).collect();
            if !combined.contains(move_event) {
                combined.push(move_event.clone());
            }
            let combined = merged_sorted(combined);

            let (first, last) = (combined.first()?.timestamp, combined.last()?.timestamp);
            if !within_window(first, last, temp_window_ms) {
                trace!(temp = %group.key, "Temp write+rename outside window");
                continue;
            }

            let final_path = move_event
                .dest_path
                .clone()
                .unwrap_or_else(|| move_event.path.clone());
            let temp_file = group.events[0].path.clone();
            return FileOperation::atomic_save(
                SavePattern::TempModifyRename,
                final_path,
                &temp_file,
                combined,
            );
        }

        None
    }
}
