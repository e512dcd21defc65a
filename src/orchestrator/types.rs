//! Core types for the orchestrator pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::logging::RunLogger;
use crate::models::{ClipRole, CorrelationResult, JobSpec, ResolvedOffset};

/// Progress callback type for reporting pipeline progress.
///
/// Arguments: (step_name, percent_complete, message)
pub type ProgressCallback = Box<dyn Fn(&str, u32, &str) + Send + Sync>;

/// Read-only context passed to pipeline steps.
///
/// Contains run configuration and shared resources that steps can read
/// but not modify. Mutable state goes in `JobState`.
pub struct Context {
    /// The two clips and the search window.
    pub job_spec: JobSpec,
    /// Application settings.
    pub settings: Settings,
    /// Run name/identifier.
    pub job_name: String,
    /// Working directory for intermediate files.
    pub work_dir: PathBuf,
    /// Path of the combined output container.
    pub output_path: PathBuf,
    /// Per-run logger.
    pub logger: Arc<RunLogger>,
    /// Optional progress callback.
    progress_callback: Option<ProgressCallback>,
}

impl Context {
    /// Create a new context for a run.
    pub fn new(
        job_spec: JobSpec,
        settings: Settings,
        job_name: impl Into<String>,
        logger: Arc<RunLogger>,
    ) -> Self {
        let work_dir = settings.work_dir();
        let output_path = settings.output_path();
        Self {
            job_spec,
            settings,
            job_name: job_name.into(),
            work_dir,
            output_path,
            logger,
            progress_callback: None,
        }
    }

    /// Set the progress callback.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Report progress to the callback (if set).
    pub fn report_progress(&self, step_name: &str, percent: u32, message: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback(step_name, percent, message);
        }
    }

    /// Whether the combined output container already exists.
    ///
    /// Its presence gates extraction, correlation, resolution, and mux
    /// on re-run.
    pub fn output_exists(&self) -> bool {
        self.output_path.exists()
    }

    /// Path of the extracted correlation clip for a role.
    pub fn wav_path(&self, role: ClipRole) -> PathBuf {
        self.work_dir
            .join(format!("{}.wav", self.job_spec.clip(role).file_stem()))
    }

    /// Path of the generated player keymap.
    pub fn keymap_path(&self) -> PathBuf {
        self.work_dir.join("input.conf")
    }
}

/// Mutable run state that accumulates results from pipeline steps.
///
/// This is a write-once manifest - steps add new data but do not
/// overwrite what earlier steps recorded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobState {
    /// Unique run identifier.
    pub job_id: String,
    /// When the run started.
    pub started_at: Option<String>,
    /// Extraction results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract: Option<ExtractOutput>,
    /// Correlation oracle result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<CorrelationOutput>,
    /// Resolved offset derived from the correlation result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<ResolvedOffset>,
    /// Mux step results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mux: Option<MuxOutput>,
}

impl JobState {
    /// Create a new run state with the given ID.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Check if extraction has been completed.
    pub fn has_extraction(&self) -> bool {
        self.extract.is_some()
    }

    /// Check if correlation has been completed.
    pub fn has_correlation(&self) -> bool {
        self.correlation.is_some()
    }

    /// Check if offset resolution has been completed.
    pub fn has_resolution(&self) -> bool {
        self.resolved.is_some()
    }
}

/// Output from the Extract step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractOutput {
    /// Extracted correlation clip for the first source.
    pub first_wav: PathBuf,
    /// Extracted correlation clip for the second source.
    pub second_wav: PathBuf,
}

/// Output from the Correlate step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationOutput {
    /// The oracle's verdict.
    pub result: CorrelationResult,
}

/// Output from the Mux step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuxOutput {
    /// Path to the combined output container.
    pub output_path: PathBuf,
    /// ffmpeg exit code.
    pub exit_code: i32,
    /// ffmpeg command that was run.
    pub command: String,
}

/// Result of executing a pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed successfully.
    Success,
    /// Step was skipped (artifact already present, not an error).
    Skipped(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClipRole;

    #[test]
    fn job_state_tracks_completion() {
        let mut state = JobState::new("a+b");
        assert!(!state.has_extraction());
        assert!(!state.has_resolution());

        state.resolved = Some(ResolvedOffset::new(ClipRole::First, 2452.5));
        assert!(state.has_resolution());
    }

    #[test]
    fn job_state_serializes() {
        let state = JobState::new("a+b");
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"job_id\":\"a+b\""));
    }
}
