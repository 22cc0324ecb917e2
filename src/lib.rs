//! Core library for `atomic_save`.
//!
//! Classifies short, time-ordered lists of raw filesystem events into
//! "atomic save" operations: an application writes a temporary file and then
//! makes it visible at the real path by renaming or replacing.
//!
//! Layout:
//! - `events`: raw observations (`FileEvent`, `EventType`) and time helpers
//! - `operation`: synthesized `FileOperation` results
//! - `temp_names`: temp-file naming conventions (`TempNaming`)
//! - `detector`: the four heuristics on `TempPatternDetector`
//! - `config`, `cli`, `input`, `output`: the surrounding tool
//!
//! ```
//! use atomic_save::prelude::*;
//! use chrono::{Duration, Utc};
//!
//! let t0 = Utc::now();
//! let events = vec![
//!     FileEvent::created("/docs/.notes.md.tmp", t0),
//!     FileEvent::moved("/docs/.notes.md.tmp", "/docs/notes.md", t0 + Duration::milliseconds(30)),
//! ];
//! let op = TempPatternDetector::default()
//!     .detect_temp_rename_pattern(&events, TEMP_RENAME_WINDOW_MS)
//!     .expect("atomic save");
//! assert_eq!(op.primary_path, std::path::PathBuf::from("/docs/notes.md"));
//! ```

pub mod cli;
pub mod config;
pub mod detector;
pub mod errors;
pub mod events;
pub mod input;
pub mod operation;
pub mod output;
pub mod temp_names;

pub use config::{Config, LogLevel, default_config_path, load_config, load_config_from_xml_path};
pub use detector::{
    DELETE_TEMP_WINDOW_MS, DetectionWindows, TEMP_CREATE_DELETE_WINDOW_MS, TEMP_MODIFY_WINDOW_MS,
    TEMP_RENAME_WINDOW_MS, TempPatternDetector,
};
pub use errors::AtomicSaveError;
pub use events::{EventType, FileEvent, sort_chronologically};
pub use operation::{FileOperation, OperationType, SavePattern};
pub use temp_names::TempNaming;

/// Convenience re-exports for library users.
pub mod prelude {
    pub use crate::config::{Config, LogLevel, default_config_path, load_config};
    pub use crate::detector::{
        DELETE_TEMP_WINDOW_MS, DetectionWindows, TEMP_CREATE_DELETE_WINDOW_MS,
        TEMP_MODIFY_WINDOW_MS, TEMP_RENAME_WINDOW_MS, TempPatternDetector,
    };
    pub use crate::errors::AtomicSaveError as Error;
    pub use crate::events::{EventType, FileEvent, sort_chronologically};
    pub use crate::input::{parse_events, read_events};
    pub use crate::operation::{FileOperation, OperationType, SavePattern};
    pub use crate::temp_names::TempNaming;
}
