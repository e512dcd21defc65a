//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level
//! updates.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::analysis::OracleCommand;
use crate::models::{JobSpec, SearchWindow, SourceClip};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// The two source clips.
    #[serde(default)]
    pub sources: SourcesSettings,

    /// Clip extraction settings.
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Correlation oracle settings.
    #[serde(default)]
    pub oracle: OracleSettings,

    /// Playback settings.
    #[serde(default)]
    pub playback: PlaybackSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Working directory for intermediate files.
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.work_dir)
    }

    /// Logs directory.
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.logs_dir)
    }

    /// The fixed-name combined output container.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.paths.output_file)
    }

    /// Build the job spec from the configured sources.
    ///
    /// Returns None until both sources are configured.
    pub fn job_spec(&self) -> Option<JobSpec> {
        let first = self.sources.first.clone()?;
        let second = self.sources.second.clone()?;
        Some(JobSpec::new(
            first,
            second,
            SearchWindow::new(self.analysis.search_window_secs),
        ))
    }

    /// Build the oracle command template from the oracle and analysis
    /// sections.
    pub fn oracle_command(&self) -> OracleCommand {
        OracleCommand {
            program: self.oracle.command.clone(),
            search_duration_secs: self.analysis.search_window_secs,
            max_lag_secs: self.oracle.max_lag_secs,
            denoise: self.oracle.denoise,
            quiet: self.oracle.quiet,
        }
    }
}

/// Path configuration for intermediates, output, and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Working directory for extracted clips and the player keymap.
    #[serde(default = "default_work_dir")]
    pub work_dir: String,

    /// Fixed-name combined output container. Its presence gates
    /// recomputation on re-run.
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Folder for run log files.
    #[serde(default = "default_logs_dir")]
    pub logs_dir: String,
}

fn default_work_dir() -> String {
    "sync_work".to_string()
}

fn default_output_file() -> String {
    "combined.mkv".to_string()
}

fn default_logs_dir() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            output_file: default_output_file(),
            logs_dir: default_logs_dir(),
        }
    }
}

/// The two source clips. Edited in the config file or overridden on the
/// command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesSettings {
    /// First source clip (path + correlation window start).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<SourceClip>,

    /// Second source clip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<SourceClip>,
}

/// Clip extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Duration of the audio window extracted from each clip, seconds.
    #[serde(default = "default_search_window")]
    pub search_window_secs: f64,

    /// Sample rate of extracted clips.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Channel count of extracted clips.
    #[serde(default = "default_channels")]
    pub channels: u32,
}

fn default_search_window() -> f64 {
    120.0
}

fn default_sample_rate() -> u32 {
    crate::analysis::DEFAULT_SAMPLE_RATE
}

fn default_channels() -> u32 {
    crate::analysis::DEFAULT_CHANNELS
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            search_window_secs: default_search_window(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
        }
    }
}

/// Correlation oracle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleSettings {
    /// Oracle program name or path.
    #[serde(default = "default_oracle_command")]
    pub command: String,

    /// Maximum lag the oracle should consider, seconds.
    #[serde(default = "default_max_lag")]
    pub max_lag_secs: f64,

    /// Ask the oracle to noise-filter the clips.
    #[serde(default)]
    pub denoise: bool,

    /// Run the oracle in quiet mode (result only on stdout).
    #[serde(default = "default_true")]
    pub quiet: bool,
}

fn default_oracle_command() -> String {
    "audio-offset-finder".to_string()
}

fn default_max_lag() -> f64 {
    300.0
}

fn default_true() -> bool {
    true
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            command: default_oracle_command(),
            max_lag_secs: default_max_lag(),
            denoise: false,
            quiet: true,
        }
    }
}

/// Playback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Player program name or path.
    #[serde(default = "default_player")]
    pub player: String,

    /// Launch the player after a successful mux.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Resume from the last playback position and persist it on exit.
    #[serde(default = "default_true")]
    pub resume: bool,

    /// Key bound to switching to the first video stream.
    #[serde(default = "default_key_first")]
    pub key_first: String,

    /// Key bound to switching to the second video stream.
    #[serde(default = "default_key_second")]
    pub key_second: String,
}

fn default_player() -> String {
    "mpv".to_string()
}

fn default_key_first() -> String {
    "F1".to_string()
}

fn default_key_second() -> String {
    "F2".to_string()
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            player: default_player(),
            enabled: true,
            resume: true,
            key_first: default_key_first(),
            key_second: default_key_second(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Use compact log output (filter tool chatter, show tail on error).
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of tool-output lines kept for error diagnosis.
    #[serde(default = "default_error_tail")]
    pub error_tail: usize,

    /// Progress update step percentage.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,

    /// Show timestamps in the run log.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_error_tail() -> usize {
    20
}

fn default_progress_step() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            compact: true,
            error_tail: default_error_tail(),
            progress_step: default_progress_step(),
            show_timestamps: true,
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Paths,
    Sources,
    Analysis,
    Oracle,
    Playback,
    Logging,
}

impl ConfigSection {
    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Sources => "sources",
            ConfigSection::Analysis => "analysis",
            ConfigSection::Oracle => "oracle",
            ConfigSection::Playback => "playback",
            ConfigSection::Logging => "logging",
        }
    }
}
