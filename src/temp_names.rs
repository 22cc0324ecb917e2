//! Temp file naming conventions.
//! Decides whether a path is an editor/tool staging file and which real file
//! name it stands in for. Only the final path component is inspected.
//!
//! Recognised forms:
//! - `name.tmp`, `.name.tmp.1234`, `name.TEMP` (a trailing `tmp`/`temp` dot
//!   segment, optionally followed by pid or random tokens)
//! - vim swap files `.name.swp` / `.name.swx`
//! - backups `name~`, emacs `#name#` and `.#name`
//! - partial downloads `name.part`, `.partial`, `.crdownload`, `.download`
//! - GNOME `.goutputstream-XXXXXX` (temp, but no derivable base name)

use std::path::Path;

/// Suffixes whose removal yields the real file name.
pub const PARTIAL_SUFFIXES: &[&str] = &[".part", ".partial", ".crdownload", ".download"];

const TEMP_SEGMENTS: &[&str] = &["tmp", "temp"];
const GOUTPUTSTREAM_PREFIX: &str = ".goutputstream-";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TempNaming {
    extra_suffixes: Vec<String>,
}

impl TempNaming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add user-supplied suffixes that behave like `.part`.
    pub fn with_extra_suffixes<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra_suffixes = suffixes
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self { extra_suffixes }
    }

    pub fn extra_suffixes(&self) -> &[String] {
        &self.extra_suffixes
    }

    /// Whether `path` follows a temp-file naming convention.
    pub fn is_temp_file(&self, path: &Path) -> bool {
        self.classify(path).is_some()
    }

    /// Real file name a temp file stands in for, if one can be derived.
    pub fn extract_base_name(&self, path: &Path) -> Option<String> {
        self.classify(path).flatten()
    }

    // Outer Option: is it a temp file at all. Inner: the derivable base name.
    fn classify(&self, path: &Path) -> Option<Option<String>> {
        let name = path.file_name()?.to_str()?;

        if name.starts_with(GOUTPUTSTREAM_PREFIX) {
            return Some(None);
        }

        if name.starts_with('.')
            && let Some(base) =
                strip_suffix_ci(name, ".swp").or_else(|| strip_suffix_ci(name, ".swx"))
        {
            return Some(non_empty(&base[1..]));
        }

        if name.len() > 2 && name.starts_with('#') && name.ends_with('#') {
            return Some(non_empty(&name[1..name.len() - 1]));
        }

        if let Some(rest) = name.strip_prefix(".#") {
            return Some(non_empty(rest));
        }

        if let Some(base) = name.strip_suffix('~') {
            return Some(non_empty(base));
        }

        if let Some(base) = temp_segment_base(name) {
            return Some(base);
        }

        PARTIAL_SUFFIXES
            .iter()
            .copied()
            .chain(self.extra_suffixes.iter().map(String::as_str))
            .find_map(|suffix| strip_suffix_ci(name, suffix))
            .map(non_empty)
    }
}

/// `Some(base)` when a dot segment after the first equals tmp/temp and is
/// either last or followed only by unique-suffix segments (`.tmp.4411`).
/// One leading dot of a hidden temp name is dropped from the base.
fn temp_segment_base(name: &str) -> Option<Option<String>> {
    let segments: Vec<&str> = name.split('.').collect();
    let idx = segments
        .iter()
        .skip(1)
        .rposition(|seg| TEMP_SEGMENTS.iter().any(|t| seg.eq_ignore_ascii_case(t)))
        .map(|pos| pos + 1)?;
    if !segments[idx + 1..].iter().all(|seg| is_unique_suffix(seg)) {
        return None;
    }

    let head = if segments[0].is_empty() {
        &segments[1..idx]
    } else {
        &segments[..idx]
    };
    Some(non_empty(&head.join(".")))
}

/// pid, counter or random token: alphanumeric with at least one digit.
fn is_unique_suffix(seg: &str) -> bool {
    !seg.is_empty()
        && seg.chars().all(|c| c.is_ascii_alphanumeric())
        && seg.chars().any(|c| c.is_ascii_digit())
}

fn strip_suffix_ci<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    if suffix.is_empty() || name.len() <= suffix.len() {
        return None;
    }
    let cut = name.len() - suffix.len();
    if !name.is_char_boundary(cut) {
        return None;
    }
    name[cut..]
        .eq_ignore_ascii_case(suffix)
        .then(|| &name[..cut])
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
