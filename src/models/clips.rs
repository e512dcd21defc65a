//! Clip-related data structures (timestamps, source clips, job specs).

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::enums::ClipRole;

/// Error parsing a timestamp string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid time format: '{input}' (expected e.g. '1h2m3s' or '00:54:45')")]
pub struct TimestampParseError {
    pub input: String,
}

/// A point in time within a source video, with second precision.
///
/// Parses both the suffix form (`12h34m56s`, `34m`, `2h`) and the
/// colon form (`HH:MM:SS` or `MM:SS`). Displays as `HH:MM:SS`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Timestamp {
    /// Create a timestamp from hours, minutes, and seconds.
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Total seconds from the start of the video.
    pub fn total_seconds(&self) -> f64 {
        (self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64) as f64
    }

    /// Parse the suffix form: `12h34m56s`, `34m`, `2h`, `56s`.
    ///
    /// Each unit is optional but they must appear in h, m, s order and
    /// at least one must be present.
    fn parse_suffix_form(s: &str) -> Option<Self> {
        let mut hours = 0u32;
        let mut minutes = 0u32;
        let mut seconds = 0u32;
        let mut rest = s;
        let mut matched = false;

        for (unit, slot) in [
            ('h', &mut hours),
            ('m', &mut minutes),
            ('s', &mut seconds),
        ] {
            if let Some(pos) = rest.find(unit) {
                let digits = &rest[..pos];
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                *slot = digits.parse().ok()?;
                rest = &rest[pos + 1..];
                matched = true;
            }
        }

        if !matched || !rest.is_empty() {
            return None;
        }
        Some(Self::new(hours, minutes, seconds))
    }

    /// Parse the colon form: `HH:MM:SS` or `MM:SS`.
    fn parse_colon_form(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let nums: Vec<u32> = parts
            .iter()
            .map(|p| {
                if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                    None
                } else {
                    p.parse().ok()
                }
            })
            .collect::<Option<Vec<_>>>()?;

        match nums.as_slice() {
            [h, m, s] => Some(Self::new(*h, *m, *s)),
            [m, s] => Some(Self::new(0, *m, *s)),
            _ => None,
        }
    }
}

impl FromStr for Timestamp {
    type Err = TimestampParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = if s.contains(':') {
            Self::parse_colon_form(s)
        } else {
            Self::parse_suffix_form(s)
        };
        parsed.ok_or_else(|| TimestampParseError {
            input: s.to_string(),
        })
    }
}

impl TryFrom<String> for Timestamp {
    type Error = TimestampParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// One source video and the start of its correlation window.
///
/// Immutable once configured; the start timestamp marks where the
/// audio window used for correlation begins within this video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceClip {
    /// Path to the source video file.
    pub path: PathBuf,
    /// Start of the correlation window within this video.
    #[serde(default)]
    pub start: Timestamp,
}

impl SourceClip {
    /// Create a source clip.
    pub fn new(path: impl Into<PathBuf>, start: Timestamp) -> Self {
        Self {
            path: path.into(),
            start,
        }
    }

    /// Start of the correlation window in seconds.
    pub fn start_secs(&self) -> f64 {
        self.start.total_seconds()
    }

    /// File name of the source video (lossy).
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// File stem of the source video (lossy).
    pub fn file_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Duration of audio extracted from each clip for correlation.
///
/// Shared by both clips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchWindow {
    /// Window duration in seconds.
    pub duration_secs: f64,
}

impl SearchWindow {
    pub fn new(duration_secs: f64) -> Self {
        Self { duration_secs }
    }
}

impl Default for SearchWindow {
    fn default() -> Self {
        Self {
            duration_secs: 120.0,
        }
    }
}

/// Specification for a sync job: the two clips and the search window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    /// The first source clip.
    pub first: SourceClip,
    /// The second source clip.
    pub second: SourceClip,
    /// Correlation search window shared by both clips.
    #[serde(default)]
    pub search: SearchWindow,
}

impl JobSpec {
    /// Create a job spec for two clips.
    pub fn new(first: SourceClip, second: SourceClip, search: SearchWindow) -> Self {
        Self {
            first,
            second,
            search,
        }
    }

    /// Get the clip for a role.
    pub fn clip(&self, role: ClipRole) -> &SourceClip {
        match role {
            ClipRole::First => &self.first,
            ClipRole::Second => &self.second,
        }
    }

    /// Window start in seconds for a role.
    pub fn start_secs(&self, role: ClipRole) -> f64 {
        self.clip(role).start_secs()
    }

    /// Source path for a role.
    pub fn path(&self, role: ClipRole) -> &Path {
        &self.clip(role).path
    }

    /// Job name derived from the two file stems.
    pub fn job_name(&self) -> String {
        format!("{}+{}", self.first.file_stem(), self.second.file_stem())
    }
}
