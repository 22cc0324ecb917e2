//! Recorded event input.
//! Accepts JSON lines (one event object per line) or a single JSON array.
//!
//! Record shape:
//! `{"event_type": "moved", "path": "/d/a.tmp", "dest_path": "/d/a", "timestamp": "2024-05-01T12:00:00.120Z"}`
//!
//! `timestamp` is either an RFC 3339 string or epoch seconds (fractional allowed).
//! Blank lines and lines starting with `#` are ignored (before an array, too).
//! Unknown fields are ignored.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::AtomicSaveError;
use crate::events::{EventType, FileEvent};

#[derive(Debug, Deserialize)]
struct RawEvent {
    event_type: String,
    path: PathBuf,
    #[serde(default)]
    dest_path: Option<PathBuf>,
    timestamp: RawTimestamp,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    EpochSeconds(f64),
    Text(String),
}

impl RawTimestamp {
    fn to_utc(&self) -> Result<DateTime<Utc>, String> {
        match self {
            RawTimestamp::EpochSeconds(secs) => {
                if !secs.is_finite() {
                    return Err(format!("timestamp {secs} is not finite"));
                }
                let whole = secs.floor();
                let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
                DateTime::from_timestamp(whole as i64, nanos)
                    .ok_or_else(|| format!("timestamp {secs} out of range"))
            }
            RawTimestamp::Text(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| format!("timestamp '{s}': {e}")),
        }
    }
}

impl RawEvent {
    fn into_event(self) -> Result<FileEvent, String> {
        let event_type = self.event_type.parse::<EventType>()?;
        let timestamp = self.timestamp.to_utc()?;
        let dest_path = self.dest_path.filter(|p| !p.as_os_str().is_empty());
        Ok(FileEvent::new(event_type, self.path, dest_path, timestamp))
    }
}

fn is_skipped(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

/// Parse events from text. `source` names the input in error messages.
pub fn parse_events(content: &str, source: &str) -> Result<Vec<FileEvent>, AtomicSaveError> {
    let is_array = content
        .lines()
        .find(|l| !is_skipped(l))
        .is_some_and(|l| l.trim_start().starts_with('['));
    let events = if is_array {
        parse_array(content)?
    } else {
        parse_lines(content)?
    };

    if events.is_empty() {
        return Err(AtomicSaveError::EmptyInput(source.to_string()));
    }
    debug!(count = events.len(), source, "Parsed events");
    Ok(events)
}

fn parse_array(content: &str) -> Result<Vec<FileEvent>, AtomicSaveError> {
    // Leading comment lines are blanked, not removed, so reported lines stay true.
    let mut body = String::with_capacity(content.len());
    let mut leading = true;
    for line in content.lines() {
        if leading && is_skipped(line) {
            body.push('\n');
            continue;
        }
        leading = false;
        body.push_str(line);
        body.push('\n');
    }

    let raw: Vec<RawEvent> =
        serde_json::from_str(&body).map_err(|e| AtomicSaveError::InvalidEvent {
            line: e.line(),
            reason: e.to_string(),
        })?;
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| {
            r.into_event().map_err(|reason| AtomicSaveError::InvalidRecord {
                record: i + 1,
                reason,
            })
        })
        .collect()
}

fn parse_lines(content: &str) -> Result<Vec<FileEvent>, AtomicSaveError> {
    let mut events = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if is_skipped(line) {
            continue;
        }
        let line_no = idx + 1;
        let invalid = |reason: String| AtomicSaveError::InvalidEvent {
            line: line_no,
            reason,
        };
        let raw: RawEvent = serde_json::from_str(line.trim()).map_err(|e| invalid(e.to_string()))?;
        events.push(raw.into_event().map_err(invalid)?);
    }
    Ok(events)
}

/// Read events from `path`, or from stdin when `path` is None or `-`.
pub fn read_events(path: Option<&Path>) -> Result<Vec<FileEvent>> {
    match path {
        Some(p) if p != Path::new("-") => {
            let content = fs::read_to_string(p)
                .with_context(|| format!("read events from '{}'", p.display()))?;
            Ok(parse_events(&content, &p.display().to_string())?)
        }
        _ => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("read events from stdin")?;
            Ok(parse_events(&content, "<stdin>")?)
        }
    }
}
