//! Mux step - combines both sources into one container with ffmpeg.
//!
//! The leader becomes stream-group 0, the follower stream-group 1 with
//! `-itsoffset` applied; codecs are copied, never re-encoded. The step
//! skips when the output container already exists.

use std::process::Command;

use crate::mux::MuxOptionsBuilder;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, MuxOutput, StepOutcome};

/// Mux step merging both sources with ffmpeg.
pub struct MuxStep {
    /// ffmpeg program name or path.
    ffmpeg_program: String,
}

impl MuxStep {
    pub fn new() -> Self {
        Self {
            ffmpeg_program: "ffmpeg".to_string(),
        }
    }

    /// Use a custom ffmpeg executable.
    pub fn with_ffmpeg_program(mut self, program: impl Into<String>) -> Self {
        self.ffmpeg_program = program.into();
        self
    }

    /// Execute ffmpeg with the given tokens.
    fn run_ffmpeg(&self, ctx: &Context, tokens: &[String]) -> StepResult<i32> {
        ctx.logger
            .command(&format!("{} {}", self.ffmpeg_program, tokens.join(" ")));

        let result = Command::new(&self.ffmpeg_program)
            .args(tokens)
            .output()
            .map_err(|e| StepError::io_error("executing ffmpeg", e))?;

        let exit_code = result.status.code().unwrap_or(-1);

        for line in String::from_utf8_lossy(&result.stdout).lines() {
            ctx.logger.output_line(line, false);
        }
        for line in String::from_utf8_lossy(&result.stderr).lines() {
            ctx.logger.output_line(line, true);
        }

        if !result.status.success() {
            ctx.logger.show_tail("ffmpeg output");
            return Err(StepError::command_failed(
                &self.ffmpeg_program,
                exit_code,
                String::from_utf8_lossy(&result.stderr).trim().to_string(),
            ));
        }

        Ok(exit_code)
    }
}

impl Default for MuxStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for MuxStep {
    fn name(&self) -> &str {
        "Mux"
    }

    fn description(&self) -> &str {
        "Merge both sources into one container with ffmpeg"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        for clip in [&ctx.job_spec.first, &ctx.job_spec.second] {
            if !clip.path.exists() {
                return Err(StepError::file_not_found(clip.path.display().to_string()));
            }
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

        let resolved = state
            .resolved
            .as_ref()
            .ok_or_else(|| StepError::precondition_failed("Resolve step did not record an offset"))?;

        let leader_path = ctx.job_spec.path(resolved.leader);
        let follower_path = ctx.job_spec.path(resolved.follower);

        ctx.logger.info(&format!(
            "Muxing: leader={}, follower={} (+{:.3}s) -> {}",
            leader_path.display(),
            follower_path.display(),
            resolved.offset_secs,
            ctx.output_path.display()
        ));

        let tokens = MuxOptionsBuilder::new(
            leader_path,
            follower_path,
            resolved.offset_secs,
            &ctx.output_path,
        )
        .build();

        let exit_code = self.run_ffmpeg(ctx, &tokens)?;

        state.mux = Some(MuxOutput {
            output_path: ctx.output_path.clone(),
            exit_code,
            command: format!("{} {}", self.ffmpeg_program, tokens.join(" ")),
        });

        ctx.logger
            .success(&format!("Muxed to: {}", ctx.output_path.display()));

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.mux.is_none() {
            return Err(StepError::invalid_output("Mux results not recorded"));
        }

        if !ctx.output_path.exists() {
            return Err(StepError::invalid_output(format!(
                "Output container not created: {}",
                ctx.output_path.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::logging::{LogConfig, RunLogger};
    use crate::models::{ClipRole, JobSpec, ResolvedOffset, SearchWindow, SourceClip, Timestamp};
    use std::path::Path;
    use std::sync::Arc;

    fn test_context(dir: &Path) -> Context {
        let mut settings = Settings::default();
        settings.paths.work_dir = dir.join("work").to_string_lossy().to_string();
        settings.paths.output_file = dir.join("combined.mkv").to_string_lossy().to_string();

        let spec = JobSpec::new(
            SourceClip::new(dir.join("a.mkv"), Timestamp::default()),
            SourceClip::new(dir.join("b.mkv"), Timestamp::default()),
            SearchWindow::default(),
        );

        let logger = Arc::new(RunLogger::new("mux_test", dir, LogConfig::default(), None).unwrap());
        Context::new(spec, settings, "mux_test", logger)
    }

    #[test]
    fn mux_step_has_correct_name() {
        let step = MuxStep::new();
        assert_eq!(step.name(), "Mux");
    }

    #[test]
    fn skips_when_output_exists() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        std::fs::write(&ctx.output_path, b"muxed").unwrap();

        let mut state = JobState::new("mux_test");
        let outcome = MuxStep::new().execute(&ctx, &mut state).unwrap();

        assert!(matches!(outcome, StepOutcome::Skipped(_)));
        assert!(state.mux.is_none());
    }

    #[test]
    fn fails_without_resolved_offset() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        let mut state = JobState::new("mux_test");
        let result = MuxStep::new().execute(&ctx, &mut state);

        assert!(matches!(result, Err(StepError::PreconditionFailed(_))));
    }

    #[test]
    fn validate_input_rejects_missing_sources() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        let result = MuxStep::new().validate_input(&ctx);
        assert!(matches!(result, Err(StepError::FileNotFound { .. })));
    }

    #[test]
    fn follower_path_comes_from_resolved_roles() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        let resolved = ResolvedOffset::new(ClipRole::Second, 4.0);
        assert_eq!(ctx.job_spec.path(resolved.leader), dir.path().join("b.mkv"));
        assert_eq!(
            ctx.job_spec.path(resolved.follower),
            dir.path().join("a.mkv")
        );
    }
}
