//! Higher-level operations synthesized from raw events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::events::FileEvent;

/// Metadata key naming the temp file that staged the save.
pub const META_TEMP_FILE: &str = "temp_file";
/// Metadata key naming the heuristic that matched.
pub const META_PATTERN: &str = "pattern";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    AtomicSave,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationType::AtomicSave => f.write_str("atomic save"),
        }
    }
}

/// The idiom a detector recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SavePattern {
    /// create temp → rename temp onto final
    TempRename,
    /// delete original → create temp → rename temp onto original
    DeleteTempRename,
    /// create temp → modify temp (1+) → rename temp onto final
    TempModifyRename,
    /// create temp → delete temp → create real, no rename
    TempCreateDeleteCreateReal,
}

impl SavePattern {
    /// Tag stored under `metadata["pattern"]`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SavePattern::TempRename => "temp_rename",
            SavePattern::DeleteTempRename => "delete_temp_rename",
            SavePattern::TempModifyRename => "temp_modify_rename",
            SavePattern::TempCreateDeleteCreateReal => "temp_create_delete_create_real",
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            SavePattern::TempRename => 0.95,
            SavePattern::DeleteTempRename => 0.90,
            SavePattern::TempModifyRename => 0.92,
            SavePattern::TempCreateDeleteCreateReal => 0.92,
        }
    }

    fn describe(&self, file_name: &str) -> String {
        match self {
            SavePattern::TempRename => {
                format!("Atomic save of {file_name} via temp file rename")
            }
            SavePattern::DeleteTempRename => {
                format!("Atomic save of {file_name} via delete and temp file rename")
            }
            SavePattern::TempModifyRename => {
                format!("Atomic save of {file_name} via temp file write and rename")
            }
            SavePattern::TempCreateDeleteCreateReal => {
                format!("Atomic save of {file_name} via temp file staging")
            }
        }
    }
}

impl fmt::Display for SavePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A synthesized operation. Constructed once per match, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileOperation {
    pub operation_type: OperationType,
    pub primary_path: PathBuf,
    pub events: Vec<FileEvent>,
    pub confidence: f64,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_atomic: bool,
    pub is_safe: bool,
    pub files_affected: Vec<PathBuf>,
    pub metadata: BTreeMap<String, String>,
}

impl FileOperation {
    /// Build an atomic-save operation. `events` must be non-empty and
    /// chronological; the time bounds come from its first and last entries.
    pub(crate) fn atomic_save(
        pattern: SavePattern,
        primary_path: PathBuf,
        temp_file: &Path,
        events: Vec<FileEvent>,
    ) -> Option<Self> {
        let start_time = events.first()?.timestamp;
        let end_time = events.last()?.timestamp;

        let file_name = primary_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| primary_path.to_string_lossy().into_owned());

        let mut metadata = BTreeMap::new();
        metadata.insert(
            META_TEMP_FILE.to_string(),
            temp_file.to_string_lossy().into_owned(),
        );
        metadata.insert(META_PATTERN.to_string(), pattern.as_str().to_string());

        Some(Self {
            operation_type: OperationType::AtomicSave,
            files_affected: vec![primary_path.clone()],
            description: pattern.describe(&file_name),
            primary_path,
            events,
            confidence: pattern.confidence(),
            start_time,
            end_time,
            is_atomic: true,
            is_safe: true,
            metadata,
        })
    }

    /// Pattern tag recorded in metadata.
    pub fn pattern(&self) -> Option<&str> {
        self.metadata.get(META_PATTERN).map(String::as_str)
    }

    pub fn temp_file(&self) -> Option<&str> {
        self.metadata.get(META_TEMP_FILE).map(String::as_str)
    }

    /// Span of the matched window in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        self.end_time
            .signed_duration_since(self.start_time)
            .num_milliseconds()
    }
}
