//! delete-original → create-temp → rename-temp-to-original.

use super::TempPatternDetector;
use crate::events::{EventType, FileEvent, within_window};
use crate::operation::{FileOperation, SavePattern};

impl TempPatternDetector {
    /// Match an original being deleted, a temp file being created, and that temp
    /// file being renamed exactly onto the deleted path. Adjacent triples only.
    pub fn detect_delete_temp_pattern(
        &self,
        events: &[FileEvent],
        temp_window_ms: u64,
    ) -> Option<FileOperation> {
        if events.len() < 3 {
            return None;
        }

        events.windows(3).find_map(|triple| {
            let (delete_event, temp_create, temp_rename) = (&triple[0], &triple[1], &triple[2]);

            let shape_matches = delete_event.is(EventType::Deleted)
                && temp_create.is(EventType::Created)
                && self.naming().is_temp_file(&temp_create.path)
                && temp_rename.is(EventType::Moved)
                && temp_rename.path == temp_create.path
                && temp_rename.dest() == Some(delete_event.path.as_path());
            if !shape_matches
                || !within_window(delete_event.timestamp, temp_rename.timestamp, temp_window_ms)
            {
                return None;
            }

            FileOperation::atomic_save(
                SavePattern::DeleteTempRename,
                delete_event.path.clone(),
                &temp_create.path,
                triple.to_vec(),
            )
        })
    }
}
