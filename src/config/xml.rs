//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - Writes a commented template on request (`--init-config`).
//!
//! Notes:
//! - Unknown XML fields are rejected so typos surface early.
//! - Numeric and boolean values tolerate surrounding whitespace.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{CONFIG_ENV, path_has_symlink_ancestor, resolve_config_path};
use crate::config::types::{Config, LogLevel};
use crate::detector::DetectionWindows;
use crate::errors::AtomicSaveError;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    temp_rename_window_ms: Option<String>,
    delete_temp_window_ms: Option<String>,
    temp_modify_window_ms: Option<String>,
    temp_create_delete_window_ms: Option<String>,
    /// Comma separated, e.g. `.sb-tmp, .kate-swp`
    extra_temp_suffixes: Option<String>,
    detect_all: Option<String>,
}

fn invalid(path: &Path, field: &str, reason: impl Into<String>) -> AtomicSaveError {
    AtomicSaveError::InvalidConfig {
        path: path.to_path_buf(),
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn parse_ms(
    path: &Path,
    field: &str,
    value: Option<&str>,
    default: u64,
) -> Result<u64, AtomicSaveError> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s
            .parse::<u64>()
            .map_err(|e| invalid(path, field, format!("'{s}': {e}"))),
    }
}

fn parse_bool(path: &Path, field: &str, value: Option<&str>) -> Result<bool, AtomicSaveError> {
    match value.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") => Ok(false),
        Some("true" | "1" | "yes") => Ok(true),
        Some("false" | "0" | "no") => Ok(false),
        Some(other) => Err(invalid(path, field, format!("'{other}' is not a boolean"))),
    }
}

// Map XmlConfig -> Config
fn xml_to_config(parsed: XmlConfig, path: &Path) -> Result<Config, AtomicSaveError> {
    let mut cfg = Config::default();

    if let Some(s) = parsed.log_level.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        cfg.log_level = s
            .parse::<LogLevel>()
            .map_err(|reason| invalid(path, "log_level", reason))?;
    }
    cfg.log_file = parsed
        .log_file
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);

    let defaults = DetectionWindows::default();
    cfg.windows = DetectionWindows {
        temp_rename_ms: parse_ms(
            path,
            "temp_rename_window_ms",
            parsed.temp_rename_window_ms.as_deref(),
            defaults.temp_rename_ms,
        )?,
        delete_temp_ms: parse_ms(
            path,
            "delete_temp_window_ms",
            parsed.delete_temp_window_ms.as_deref(),
            defaults.delete_temp_ms,
        )?,
        temp_modify_ms: parse_ms(
            path,
            "temp_modify_window_ms",
            parsed.temp_modify_window_ms.as_deref(),
            defaults.temp_modify_ms,
        )?,
        temp_create_delete_ms: parse_ms(
            path,
            "temp_create_delete_window_ms",
            parsed.temp_create_delete_window_ms.as_deref(),
            defaults.temp_create_delete_ms,
        )?,
    };

    cfg.extra_temp_suffixes = parsed
        .extra_temp_suffixes
        .as_deref()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    cfg.detect_all = parse_bool(path, "detect_all", parsed.detect_all.as_deref())?;

    Ok(cfg)
}

/// Load a Config from a specific XML file path (quick_xml).
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    Ok(xml_to_config(parsed, path)?)
}

/// Resolve and load the config.
///
/// An explicit path or `ATOMIC_SAVE_CONFIG` must exist; a missing file at the
/// OS default location just means defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    // An empty ATOMIC_SAVE_CONFIG is treated as unset, matching default_config_path.
    let must_exist =
        explicit.is_some() || std::env::var_os(CONFIG_ENV).is_some_and(|v| !v.is_empty());
    let Some(path) = resolve_config_path(explicit) else {
        debug!("No config location could be determined; using defaults");
        return Ok(Config::default());
    };

    if !path.exists() {
        if must_exist {
            return Err(AtomicSaveError::ConfigNotFound(path).into());
        }
        debug!(path = %path.display(), "No config file; using defaults");
        return Ok(Config::default());
    }

    let cfg = load_config_from_xml_path(&path)?;
    debug!(path = %path.display(), "Loaded config");
    Ok(cfg)
}

/// Write a commented template config. Refuses to overwrite an existing file or
/// to write beneath a symlinked directory.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
    }

    let windows = DetectionWindows::default();
    let content = format!(
        "<!--\n  atomic_save configuration (XML)\n\n  log_level                      -> quiet | normal | info | debug\n  log_file                       -> path to log file (optional; stderr still used)\n  temp_rename_window_ms          -> create temp -> rename\n  delete_temp_window_ms          -> delete original -> create temp -> rename\n  temp_modify_window_ms          -> create temp -> modify -> rename\n  temp_create_delete_window_ms   -> create temp -> delete temp -> create real\n  extra_temp_suffixes            -> comma separated suffixes treated as temp files\n  detect_all                     -> true to report every atomic save, not only the first\n\n  CLI flags override XML values.\n-->\n<config>\n  <log_level>normal</log_level>\n  <log_file></log_file>\n  <temp_rename_window_ms>{}</temp_rename_window_ms>\n  <delete_temp_window_ms>{}</delete_temp_window_ms>\n  <temp_modify_window_ms>{}</temp_modify_window_ms>\n  <temp_create_delete_window_ms>{}</temp_create_delete_window_ms>\n  <extra_temp_suffixes></extra_temp_suffixes>\n  <detect_all>false</detect_all>\n</config>\n",
        windows.temp_rename_ms,
        windows.delete_temp_ms,
        windows.temp_modify_ms,
        windows.temp_create_delete_ms,
    );

    let mut opts = fs::OpenOptions::new();
    opts.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts
        .open(path)
        .with_context(|| format!("create config '{}'", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("write config '{}'", path.display()))?;

    info!("Created template config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_fall_back_to_defaults() {
        let cfg = xml_to_config(XmlConfig::default(), Path::new("c.xml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn parses_whitespace_padded_numbers() {
        let parsed = XmlConfig {
            temp_create_delete_window_ms: Some("  7500 \n".into()),
            ..Default::default()
        };
        let cfg = xml_to_config(parsed, Path::new("c.xml")).unwrap();
        assert_eq!(cfg.windows.temp_create_delete_ms, 7500);
        assert_eq!(cfg.windows.temp_rename_ms, 1000);
    }

    #[test]
    fn bad_number_names_the_field() {
        let parsed = XmlConfig {
            temp_modify_window_ms: Some("soon".into()),
            ..Default::default()
        };
        let err = xml_to_config(parsed, Path::new("c.xml")).unwrap_err();
        assert!(matches!(
            err,
            AtomicSaveError::InvalidConfig { ref field, .. } if field == "temp_modify_window_ms"
        ));
    }

    #[test]
    fn suffix_list_is_split_and_trimmed() {
        let parsed = XmlConfig {
            extra_temp_suffixes: Some(" .sb-tmp, ,.kate-swp ".into()),
            detect_all: Some(" TRUE ".into()),
            ..Default::default()
        };
        let cfg = xml_to_config(parsed, Path::new("c.xml")).unwrap();
        assert_eq!(cfg.extra_temp_suffixes, vec![".sb-tmp", ".kate-swp"]);
        assert!(cfg.detect_all);
    }

    #[test]
    fn template_is_loadable_and_not_overwritten() {
        let td = tempfile::tempdir().unwrap();
        let path = td.path().join("nested").join("config.xml");
        create_template_config(&path).unwrap();

        let cfg = load_config_from_xml_path(&path).unwrap();
        assert_eq!(cfg.windows, DetectionWindows::default());
        assert!(cfg.log_file.is_none());
        assert!(!cfg.detect_all);

        assert!(create_template_config(&path).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn template_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let td = tempfile::tempdir().unwrap();
        let path = td.path().join("config.xml");
        create_template_config(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
