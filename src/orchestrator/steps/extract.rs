//! Extract step - pulls the correlation window from each source.
//!
//! Extracted WAVs are filesystem checkpoints: a clip that already
//! exists in the work directory is reused instead of re-extracted, and
//! the whole step is skipped when the combined output is already
//! present.

use std::fs;

use crate::analysis::{extract_clip, get_duration, ClipExtraction};
use crate::models::ClipRole;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, ExtractOutput, JobState, StepOutcome};

/// Extract step for pulling correlation clips out of the sources.
pub struct ExtractStep;

impl ExtractStep {
    pub fn new() -> Self {
        Self
    }

    /// Extract one clip unless its WAV is already on disk.
    fn extract_one(&self, ctx: &Context, role: ClipRole) -> StepResult<()> {
        let clip = ctx.job_spec.clip(role);
        let wav = ctx.wav_path(role);

        if wav.exists() {
            ctx.logger.info(&format!(
                "Using cached clip for {} source: {}",
                role,
                wav.display()
            ));
            return Ok(());
        }

        let duration = get_duration(&clip.path)?;
        let start = clip.start_secs();
        let window = ctx.job_spec.search.duration_secs;

        if start >= duration {
            return Err(StepError::invalid_input(format!(
                "{} source window starts at {:.0}s but the file is only {:.1}s long",
                role, start, duration
            )));
        }
        if start + window > duration {
            ctx.logger.warn(&format!(
                "{} source window extends past end of file ({:.1}s), clip will be short",
                role, duration
            ));
        }

        let extraction = ClipExtraction {
            input_path: clip.path.clone(),
            start_secs: start,
            duration_secs: window,
            sample_rate: ctx.settings.analysis.sample_rate,
            channels: ctx.settings.analysis.channels,
            output_path: wav.clone(),
        };

        ctx.logger.command(&format!(
            "ffmpeg -ss {:.3} -t {:.3} -i {} ... {}",
            start,
            window,
            clip.path.display(),
            wav.display()
        ));

        extract_clip(&extraction)?;

        ctx.logger.info(&format!(
            "Extracted {} clip: {} ({}s from {})",
            role,
            wav.display(),
            window,
            clip.start
        ));

        Ok(())
    }
}

impl Default for ExtractStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ExtractStep {
    fn name(&self) -> &str {
        "Extract"
    }

    fn description(&self) -> &str {
        "Extract correlation clips from both sources"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        for role in [ClipRole::First, ClipRole::Second] {
            let path = ctx.job_spec.path(role);
            if !path.exists() {
                return Err(StepError::file_not_found(path.display().to_string()));
            }
        }

        if ctx.job_spec.search.duration_secs <= 0.0 {
            return Err(StepError::invalid_input(
                "Search window duration must be positive",
            ));
        }

        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        if ctx.output_exists() {
            return Ok(StepOutcome::Skipped(format!(
                "Combined output already present: {}",
                ctx.output_path.display()
            )));
        }

        fs::create_dir_all(&ctx.work_dir)
            .map_err(|e| StepError::io_error("creating work directory", e))?;

        self.extract_one(ctx, ClipRole::First)?;
        self.extract_one(ctx, ClipRole::Second)?;

        state.extract = Some(ExtractOutput {
            first_wav: ctx.wav_path(ClipRole::First),
            second_wav: ctx.wav_path(ClipRole::Second),
        });

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let extract = state
            .extract
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Extraction results not recorded"))?;

        for wav in [&extract.first_wav, &extract.second_wav] {
            if !wav.exists() {
                return Err(StepError::invalid_output(format!(
                    "Extracted clip missing: {}",
                    wav.display()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::logging::{LogConfig, RunLogger};
    use crate::models::{JobSpec, SearchWindow, SourceClip, Timestamp};
    use std::path::Path;
    use std::sync::Arc;

    fn test_context(dir: &Path) -> Context {
        let mut settings = Settings::default();
        settings.paths.work_dir = dir.join("work").to_string_lossy().to_string();
        settings.paths.output_file = dir.join("combined.mkv").to_string_lossy().to_string();

        let spec = JobSpec::new(
            SourceClip::new(dir.join("a.mkv"), Timestamp::new(0, 14, 5)),
            SourceClip::new(dir.join("b.mkv"), Timestamp::new(0, 54, 45)),
            SearchWindow::default(),
        );

        let logger =
            Arc::new(RunLogger::new("extract_test", dir, LogConfig::default(), None).unwrap());
        Context::new(spec, settings, "extract_test", logger)
    }

    #[test]
    fn validate_input_rejects_missing_sources() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        let result = ExtractStep::new().validate_input(&ctx);
        assert!(matches!(result, Err(StepError::FileNotFound { .. })));
    }

    #[test]
    fn validate_input_rejects_zero_window() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mkv"), b"x").unwrap();
        std::fs::write(dir.path().join("b.mkv"), b"x").unwrap();

        let mut ctx = test_context(dir.path());
        ctx.job_spec.search.duration_secs = 0.0;

        let result = ExtractStep::new().validate_input(&ctx);
        assert!(matches!(result, Err(StepError::InvalidInput(_))));
    }

    #[test]
    fn skips_when_combined_output_exists() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        std::fs::write(&ctx.output_path, b"muxed").unwrap();

        let mut state = JobState::new("extract_test");
        let outcome = ExtractStep::new().execute(&ctx, &mut state).unwrap();

        assert!(matches!(outcome, StepOutcome::Skipped(_)));
        assert!(!state.has_extraction());
    }
}
