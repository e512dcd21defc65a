//! Correlate step - runs the external oracle on the extracted clips.
//!
//! The oracle runs exactly once per run; when the combined output is
//! already present, the step skips and no oracle call happens.

use crate::models::CorrelationResult;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, CorrelationOutput, JobState, StepOutcome};

/// Correlate step invoking the external correlation oracle.
pub struct CorrelateStep;

impl CorrelateStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CorrelateStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for CorrelateStep {
    fn name(&self) -> &str {
        "Correlate"
    }

    fn description(&self) -> &str {
        "Run the audio correlation oracle on the extracted clips"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        if ctx.output_exists() {
            return Ok(StepOutcome::Skipped(format!(
                "Combined output already present: {}",
                ctx.output_path.display()
            )));
        }

        let extract = state.extract.as_ref().ok_or_else(|| {
            StepError::precondition_failed("Extract step did not record clip paths")
        })?;

        let oracle = ctx.settings.oracle_command();
        let args = oracle.build_args(&extract.first_wav, &extract.second_wav);
        ctx.logger
            .command(&format!("{} {}", oracle.program, args.join(" ")));

        let result = oracle.run(&extract.first_wav, &extract.second_wav)?;

        match result {
            CorrelationResult::Labeled { leader, lag_secs } => {
                ctx.logger.info(&format!(
                    "Oracle verdict: leader={}, lag={:+.3}s",
                    leader, lag_secs
                ));
            }
            CorrelationResult::Signed { offset_secs } => {
                ctx.logger
                    .info(&format!("Oracle verdict: signed offset {:+.3}s", offset_secs));
            }
        }

        state.correlation = Some(CorrelationOutput { result });

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if !state.has_correlation() {
            return Err(StepError::invalid_output("Correlation result not recorded"));
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
            SourceClip::new(dir.join("a.mkv"), Timestamp::default()),
            SourceClip::new(dir.join("b.mkv"), Timestamp::default()),
            SearchWindow::default(),
        );

        let logger =
            Arc::new(RunLogger::new("correlate_test", dir, LogConfig::default(), None).unwrap());
        Context::new(spec, settings, "correlate_test", logger)
    }

    #[test]
    fn skips_when_combined_output_exists() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        std::fs::write(&ctx.output_path, b"muxed").unwrap();

        let mut state = JobState::new("correlate_test");
        let outcome = CorrelateStep::new().execute(&ctx, &mut state).unwrap();

        assert!(matches!(outcome, StepOutcome::Skipped(_)));
        assert!(!state.has_correlation());
    }

    #[test]
    fn fails_without_extraction_state() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        let mut state = JobState::new("correlate_test");
        let result = CorrelateStep::new().execute(&ctx, &mut state);

        assert!(matches!(result, Err(StepError::PreconditionFailed(_))));
    }
}
