//! Config validation logic.
//! Verifies temp suffixes and the log file location before a run.

use anyhow::{Result, bail};
use tracing::{debug, warn};

use super::paths::path_has_symlink_ancestor;
use super::types::Config;

impl Config {
    /// Reject settings that would silently misbehave.
    pub fn validate(&self) -> Result<()> {
        for suffix in &self.extra_temp_suffixes {
            if suffix.trim().is_empty() {
                bail!("extra temp suffix must not be empty");
            }
            if suffix.contains('/') || suffix.contains('\\') {
                bail!("extra temp suffix '{suffix}' must not contain a path separator");
            }
        }

        if let Some(log_file) = &self.log_file {
            if log_file.is_dir() {
                bail!("log_file '{}' is a directory", log_file.display());
            }
            if path_has_symlink_ancestor(log_file)? {
                bail!(
                    "log_file '{}' has a symlinked ancestor; refusing to log there",
                    log_file.display()
                );
            }
        }

        let w = &self.windows;
        if w.temp_rename_ms == 0
            || w.delete_temp_ms == 0
            || w.temp_modify_ms == 0
            || w.temp_create_delete_ms == 0
        {
            warn!("A detection window is 0ms; only simultaneous events will match");
        }

        debug!(
            windows = ?self.windows,
            extra_suffixes = self.extra_temp_suffixes.len(),
            detect_all = self.detect_all,
            "Config validated"
        );
        Ok(())
    }
}
