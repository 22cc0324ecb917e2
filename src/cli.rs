//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - Window and suffix flags override the config file.

use clap::{Parser, ValueEnum, ValueHint};
use std::path::{Path, PathBuf};

use crate::config::types::{Config, LogLevel};

/// How detected operations are printed on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Tab separated summary lines
    #[default]
    Text,
    /// One JSON object per operation
    Json,
}

/// Detect atomic saves in recorded filesystem events.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Detect atomic-save patterns in recorded filesystem events"
)]
pub struct Args {
    /// Events file (JSON lines or a JSON array). Reads stdin when omitted or `-`.
    #[arg(value_name = "EVENTS", value_hint = ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Explicit config file (overrides ATOMIC_SAVE_CONFIG and the default location).
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Emit logs in structured JSON.
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Report every atomic save instead of only the first.
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Output format for detected operations.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Window for create-temp -> rename (ms).
    #[arg(long, value_name = "MS")]
    pub rename_window_ms: Option<u64>,

    /// Window for delete -> create-temp -> rename (ms).
    #[arg(long, value_name = "MS")]
    pub delete_window_ms: Option<u64>,

    /// Window for create-temp -> modify -> rename (ms).
    #[arg(long, value_name = "MS")]
    pub modify_window_ms: Option<u64>,

    /// Window for create-temp -> delete-temp -> create-real (ms).
    #[arg(long, value_name = "MS")]
    pub create_delete_window_ms: Option<u64>,

    /// Extra suffix treated as a temp file marker (repeatable).
    #[arg(long = "temp-suffix", value_name = "SUFFIX")]
    pub temp_suffixes: Vec<String>,

    /// Print the config file location and exit.
    #[arg(long, help = "Print the config file location used by atomic_save and exit")]
    pub print_config: bool,

    /// Write a template config file at the resolved location and exit.
    #[arg(long, help = "Write a template config file and exit")]
    pub init_config: bool,
}

impl Args {
    /// Effective input path; None means stdin.
    pub fn resolved_input(&self) -> Option<PathBuf> {
        self.input
            .as_deref()
            .map(Self::sanitize_path)
            .filter(|p| p.as_os_str() != "-")
    }

    #[inline]
    fn sanitize_path(p: &Path) -> PathBuf {
        Self::sanitize_str(&p.to_string_lossy())
    }

    #[inline]
    fn sanitize_str(s: &str) -> PathBuf {
        // Trim surrounding quotes left behind by PowerShell/CMD quoting.
        let trimmed = s.trim();
        let inner = if trimmed.len() >= 2
            && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
                || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
        {
            &trimmed[1..trimmed.len() - 1]
        } else {
            trimmed.trim_matches(|c| c == '\'' || c == '"')
        };
        PathBuf::from(inner)
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if self.all {
            cfg.detect_all = true;
        }
        if let Some(ms) = self.rename_window_ms {
            cfg.windows.temp_rename_ms = ms;
        }
        if let Some(ms) = self.delete_window_ms {
            cfg.windows.delete_temp_ms = ms;
        }
        if let Some(ms) = self.modify_window_ms {
            cfg.windows.temp_modify_ms = ms;
        }
        if let Some(ms) = self.create_delete_window_ms {
            cfg.windows.temp_create_delete_ms = ms;
        }
        for suffix in &self.temp_suffixes {
            if !cfg.extra_temp_suffixes.contains(suffix) {
                cfg.extra_temp_suffixes.push(suffix.clone());
            }
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
