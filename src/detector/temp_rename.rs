//! create-temp → rename-temp-to-final.

use tracing::trace;

use super::TempPatternDetector;
use crate::events::{EventType, FileEvent, within_window};
use crate::operation::{FileOperation, SavePattern};

impl TempPatternDetector {
    /// Match a temp file creation immediately followed by a move of that same
    /// temp file. Only adjacent pairs are considered.
    pub fn detect_temp_rename_pattern(
        &self,
        events: &[FileEvent],
        temp_window_ms: u64,
    ) -> Option<FileOperation> {
        if events.len() < 2 {
            return None;
        }

        events.windows(2).find_map(|pair| {
            let (current, next) = (&pair[0], &pair[1]);

            if !current.is(EventType::Created)
                || !self.naming().is_temp_file(&current.path)
                || !next.is(EventType::Moved)
                || next.path != current.path
            {
                return None;
            }
            let dest = next.dest()?;
            if !within_window(current.timestamp, next.timestamp, temp_window_ms) {
                trace!(temp = %current.path.display(), "Temp rename outside window");
                return None;
            }

            FileOperation::atomic_save(
                SavePattern::TempRename,
                dest.to_path_buf(),
                &current.path,
                vec![current.clone(), next.clone()],
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::at;
    use super::*;
    use std::path::PathBuf;

    fn det() -> TempPatternDetector {
        TempPatternDetector::default()
    }

    #[test]
    fn matches_create_then_rename() {
        let events = vec![
            FileEvent::created("/p/doc.txt.tmp", at(0)),
            FileEvent::moved("/p/doc.txt.tmp", "/p/doc.txt", at(120)),
        ];
        let op = det().detect_temp_rename_pattern(&events, 1000).unwrap();
        assert_eq!(op.primary_path, PathBuf::from("/p/doc.txt"));
        assert_eq!(op.confidence, 0.95);
        assert_eq!(op.events, events);
        assert_eq!(op.start_time, at(0));
        assert_eq!(op.end_time, at(120));
        assert_eq!(op.temp_file(), Some("/p/doc.txt.tmp"));
        assert_eq!(op.pattern(), Some("temp_rename"));
    }

    #[test]
    fn window_is_inclusive() {
        let events = vec![
            FileEvent::created("/p/doc.txt.tmp", at(0)),
            FileEvent::moved("/p/doc.txt.tmp", "/p/doc.txt", at(1000)),
        ];
        assert!(det().detect_temp_rename_pattern(&events, 1000).is_some());
        assert!(det().detect_temp_rename_pattern(&events, 999).is_none());
    }

    #[test]
    fn non_temp_create_never_matches() {
        let events = vec![
            FileEvent::created("/p/doc.txt", at(0)),
            FileEvent::moved("/p/doc.txt", "/p/final.txt", at(10)),
        ];
        assert!(det().detect_temp_rename_pattern(&events, 1000).is_none());
    }

    #[test]
    fn move_of_another_file_or_without_destination_is_skipped() {
        let other = vec![
            FileEvent::created("/p/a.tmp", at(0)),
            FileEvent::moved("/p/b.tmp", "/p/b", at(10)),
        ];
        assert!(det().detect_temp_rename_pattern(&other, 1000).is_none());

        let no_dest = vec![
            FileEvent::created("/p/a.tmp", at(0)),
            FileEvent::new(EventType::Moved, "/p/a.tmp", None, at(10)),
        ];
        assert!(det().detect_temp_rename_pattern(&no_dest, 1000).is_none());
    }

    #[test]
    fn only_adjacent_pairs_are_considered() {
        let events = vec![
            FileEvent::created("/p/a.txt.tmp", at(0)),
            FileEvent::modified("/p/other", at(5)),
            FileEvent::moved("/p/a.txt.tmp", "/p/a.txt", at(10)),
        ];
        assert!(det().detect_temp_rename_pattern(&events, 1000).is_none());
    }

    #[test]
    fn first_matching_pair_wins() {
        let events = vec![
            FileEvent::created("/p/a.txt.tmp", at(0)),
            FileEvent::moved("/p/a.txt.tmp", "/p/a.txt", at(10)),
            FileEvent::created("/p/b.txt.tmp", at(20)),
            FileEvent::moved("/p/b.txt.tmp", "/p/b.txt", at(30)),
        ];
        let op = det().detect_temp_rename_pattern(&events, 1000).unwrap();
        assert_eq!(op.primary_path, PathBuf::from("/p/a.txt"));
    }

    #[test]
    fn too_short_input_yields_nothing() {
        assert!(det().detect_temp_rename_pattern(&[], 1000).is_none());
        let one = [FileEvent::created("/p/a.tmp", at(0))];
        assert!(det().detect_temp_rename_pattern(&one, 1000).is_none());
    }
}
