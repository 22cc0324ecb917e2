//! Typed error definitions for atomic_save.
//! Detection itself never fails; these cover reading events and configuration.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtomicSaveError {
    #[error("Invalid event record at line {line}: {reason}")]
    InvalidEvent { line: usize, reason: String },

    #[error("Invalid event record {record} in JSON array: {reason}")]
    InvalidRecord { record: usize, reason: String },

    #[error("No events found in {0}")]
    EmptyInput(String),

    #[error("Invalid config value for {field} in {path}: {reason}")]
    InvalidConfig {
        path: PathBuf,
        field: String,
        reason: String,
    },

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),
}

impl AtomicSaveError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            AtomicSaveError::InvalidEvent { .. } => 10,
            AtomicSaveError::InvalidRecord { .. } => 12,
            AtomicSaveError::EmptyInput(_) => 11,
            AtomicSaveError::InvalidConfig { .. } => 20,
            AtomicSaveError::ConfigNotFound(_) => 21,
        }
    }

    /// Short machine-friendly kind, logged next to `code`.
    pub fn kind(&self) -> &'static str {
        match self {
            AtomicSaveError::InvalidEvent { .. } => "invalid_event",
            AtomicSaveError::InvalidRecord { .. } => "invalid_record",
            AtomicSaveError::EmptyInput(_) => "empty_input",
            AtomicSaveError::InvalidConfig { .. } => "invalid_config",
            AtomicSaveError::ConfigNotFound(_) => "config_not_found",
        }
    }
}
