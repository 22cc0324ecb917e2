//! create-temp → rename detection through the public API.

use atomic_save::prelude::*;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::path::PathBuf;

fn at(ms: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap() + Duration::milliseconds(ms)
}

#[test]
fn rename_within_window_is_an_atomic_save() {
    let events = vec![
        FileEvent::created("/home/u/.cache.db.tmp", at(0)),
        FileEvent::moved("/home/u/.cache.db.tmp", "/home/u/cache.db", at(500)),
    ];
    let op = TempPatternDetector::default()
        .detect_temp_rename_pattern(&events, TEMP_RENAME_WINDOW_MS)
        .expect("should match");

    assert_eq!(op.operation_type, OperationType::AtomicSave);
    assert_eq!(op.primary_path, PathBuf::from("/home/u/cache.db"));
    assert_eq!(op.confidence, 0.95);
    assert_eq!(op.metadata["pattern"], "temp_rename");
    assert_eq!(op.metadata["temp_file"], "/home/u/.cache.db.tmp");
    assert!(op.is_atomic);
    assert!(op.is_safe);
}

#[test]
fn rename_after_window_is_ignored() {
    let events = vec![
        FileEvent::created("/home/u/.cache.db.tmp", at(0)),
        FileEvent::moved("/home/u/.cache.db.tmp", "/home/u/cache.db", at(1500)),
    ];
    assert!(
        TempPatternDetector::default()
            .detect_temp_rename_pattern(&events, TEMP_RENAME_WINDOW_MS)
            .is_none()
    );
}

#[test]
fn non_temp_source_never_matches_whatever_follows() {
    let det = TempPatternDetector::default();
    for next in [
        FileEvent::moved("/d/report.pdf", "/d/final.pdf", at(1)),
        FileEvent::moved("/d/report.pdf", "/d/report.pdf.bak", at(1)),
    ] {
        let events = vec![FileEvent::created("/d/report.pdf", at(0)), next];
        assert!(det.detect_temp_rename_pattern(&events, 1000).is_none());
    }
}

#[test]
fn configured_suffix_makes_a_file_temp() {
    let det = TempPatternDetector::new(TempNaming::with_extra_suffixes([".sb-stage"]));
    let events = vec![
        FileEvent::created("/d/book.epub.sb-stage", at(0)),
        FileEvent::moved("/d/book.epub.sb-stage", "/d/book.epub", at(10)),
    ];
    let op = det.detect_temp_rename_pattern(&events, 1000).unwrap();
    assert_eq!(op.primary_path, PathBuf::from("/d/book.epub"));
}
