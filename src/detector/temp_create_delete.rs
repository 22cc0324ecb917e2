//! create-temp → delete-temp → create-real, with no rename in between.
//!
//! A temp create→delete cycle without a matching real-file creation is not a
//! save. It is traced at debug level and left for downstream filtering.

use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::{PathGroup, TempPatternDetector, group_by_path, merged_sorted};
use crate::events::{EventType, FileEvent, within_window};
use crate::operation::{FileOperation, SavePattern};

impl TempPatternDetector {
    pub fn detect_temp_create_delete_pattern(
        &self,
        events: &[FileEvent],
        temp_window_ms: u64,
    ) -> Option<FileOperation> {
        if events.len() < 2 {
            return None;
        }

        let naming = self.naming();
        let temp_groups = group_by_path(events, |e| naming.is_temp_file(&e.path));
        let real_groups = group_by_path(events, |e| !naming.is_temp_file(&e.path));
        let real_by_path: HashMap<&str, &PathGroup<'_>> =
            real_groups.iter().map(|g| (g.key.as_str(), g)).collect();

        for group in temp_groups.iter().filter(|g| g.events.len() >= 2) {
            let (Some(first), Some(last)) = (group.events.first(), group.events.last()) else {
                continue;
            };
            if !first.is(EventType::Created) || !last.is(EventType::Deleted) {
                continue;
            }

            if let Some(op) = self.match_real_creation(group, &real_by_path, temp_window_ms) {
                return Some(op);
            }

            debug!(
                temp_file = %group.key,
                temp_events = group.events.len(),
                "Temp file created and deleted with no matching real file"
            );
        }

        None
    }

    fn match_real_creation(
        &self,
        group: &PathGroup<'_>,
        real_by_path: &HashMap<&str, &PathGroup<'_>>,
        temp_window_ms: u64,
    ) -> Option<FileOperation> {
        let temp_created = group.events.first()?;
        let temp_deleted = group.events.last()?;
        let temp_path = temp_created.path.as_path();

        let base_name = self.naming().extract_base_name(temp_path)?;
        let real_path = temp_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(base_name);
        let real_key = real_path.to_string_lossy().into_owned();
        let real_group = real_by_path.get(real_key.as_str())?;

        let real_created = real_group
            .events
            .iter()
            .find(|e| e.is(EventType::Created) && e.timestamp >= temp_deleted.timestamp)?;
        if !within_window(temp_created.timestamp, real_created.timestamp, temp_window_ms) {
            return None;
        }

        let merged = merged_sorted(
            group
                .events
                .iter()
                .chain(std::iter::once(real_created))
                .map(|e| (*e).clone()),
        );
        FileOperation::atomic_save(
            SavePattern::TempCreateDeleteCreateReal,
            real_path,
            temp_path,
            merged,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::detector::test_support::at;
    use super::*;
    use std::path::PathBuf;

    fn det() -> TempPatternDetector {
        TempPatternDetector::default()
    }

    #[test]
    fn matches_temp_cycle_followed_by_real_create() {
        let events = vec![
            FileEvent::created("/v/report.pdf.tmp", at(0)),
            FileEvent::modified("/v/report.pdf.tmp", at(100)),
            FileEvent::deleted("/v/report.pdf.tmp", at(300)),
            FileEvent::created("/v/report.pdf", at(350)),
        ];
        let op = det().detect_temp_create_delete_pattern(&events, 5000).unwrap();

        assert_eq!(op.primary_path, PathBuf::from("/v/report.pdf"));
        assert_eq!(op.files_affected, vec![PathBuf::from("/v/report.pdf")]);
        assert_eq!(op.confidence, 0.92);
        assert_eq!(op.events, events);
        assert_eq!(op.start_time, at(0));
        assert_eq!(op.end_time, at(350));
        assert_eq!(op.pattern(), Some("temp_create_delete_create_real"));
        assert_eq!(op.temp_file(), Some("/v/report.pdf.tmp"));
    }

    #[test]
    fn temp_only_cycle_is_never_reported() {
        let events = vec![
            FileEvent::created("/v/report.pdf.tmp", at(0)),
            FileEvent::deleted("/v/report.pdf.tmp", at(300)),
        ];
        assert!(det().detect_temp_create_delete_pattern(&events, 5000).is_none());
    }

    #[test]
    fn real_create_before_temp_delete_does_not_count() {
        let events = vec![
            FileEvent::created("/v/report.pdf.tmp", at(0)),
            FileEvent::created("/v/report.pdf", at(100)),
            FileEvent::deleted("/v/report.pdf.tmp", at(300)),
        ];
        assert!(det().detect_temp_create_delete_pattern(&events, 5000).is_none());
    }

    #[test]
    fn window_is_measured_from_temp_creation() {
        let events = vec![
            FileEvent::created("/v/a.txt.tmp", at(0)),
            FileEvent::deleted("/v/a.txt.tmp", at(4000)),
            FileEvent::created("/v/a.txt", at(5000)),
        ];
        assert!(det().detect_temp_create_delete_pattern(&events, 5000).is_some());
        assert!(det().detect_temp_create_delete_pattern(&events, 4999).is_none());
    }

    #[test]
    fn real_file_must_share_the_parent_directory() {
        let events = vec![
            FileEvent::created("/v/a.txt.tmp", at(0)),
            FileEvent::deleted("/v/a.txt.tmp", at(10)),
            FileEvent::created("/elsewhere/a.txt", at(20)),
        ];
        assert!(det().detect_temp_create_delete_pattern(&events, 5000).is_none());
    }

    #[test]
    fn temp_without_base_name_is_skipped() {
        let events = vec![
            FileEvent::created("/v/.goutputstream-ABC123", at(0)),
            FileEvent::deleted("/v/.goutputstream-ABC123", at(10)),
            FileEvent::created("/v/notes.txt", at(20)),
        ];
        assert!(det().detect_temp_create_delete_pattern(&events, 5000).is_none());
    }

    #[test]
    fn relative_temp_paths_resolve_to_bare_names() {
        let events = vec![
            FileEvent::created(".a.txt.tmp", at(0)),
            FileEvent::deleted(".a.txt.tmp", at(10)),
            FileEvent::created("a.txt", at(20)),
        ];
        let op = det().detect_temp_create_delete_pattern(&events, 5000).unwrap();
        assert_eq!(op.primary_path, PathBuf::from("a.txt"));
    }

    #[test]
    fn unmatched_group_does_not_hide_a_later_match() {
        let events = vec![
            FileEvent::created("/v/lost.bin.tmp", at(0)),
            FileEvent::deleted("/v/lost.bin.tmp", at(5)),
            FileEvent::created("/v/kept.bin.tmp", at(10)),
            FileEvent::deleted("/v/kept.bin.tmp", at(15)),
            FileEvent::created("/v/kept.bin", at(20)),
        ];
        let op = det().detect_temp_create_delete_pattern(&events, 5000).unwrap();
        assert_eq!(op.primary_path, PathBuf::from("/v/kept.bin"));
        assert_eq!(op.events.len(), 3);
    }
}
