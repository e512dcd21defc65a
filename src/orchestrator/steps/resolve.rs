//! Resolve step - derives the mux offset from the correlation result.
//!
//! Pure computation; the actual arithmetic lives in
//! `mux::offset_resolver`.

use crate::models::ClipRole;
use crate::mux::resolve;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, StepOutcome};

/// Resolve step turning the oracle verdict into a mux offset.
pub struct ResolveStep;

impl ResolveStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ResolveStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ResolveStep {
    fn name(&self) -> &str {
        "Resolve"
    }

    fn description(&self) -> &str {
        "Resolve leader/follower ordering and mux offset"
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

        let correlation = state.correlation.as_ref().ok_or_else(|| {
            StepError::precondition_failed("Correlate step did not record a result")
        })?;

        let resolved = resolve(
            ctx.job_spec.start_secs(ClipRole::First),
            ctx.job_spec.start_secs(ClipRole::Second),
            correlation.result,
        );

        ctx.logger.info(&format!(
            "Resolved: leader={} ({}), follower={} ({}), offset={:.3}s",
            resolved.leader,
            ctx.job_spec.clip(resolved.leader).file_name(),
            resolved.follower,
            ctx.job_spec.clip(resolved.follower).file_name(),
            resolved.offset_secs
        ));

        state.resolved = Some(resolved);

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let resolved = state
            .resolved
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Resolved offset not recorded"))?;

        if resolved.offset_secs < 0.0 {
            return Err(StepError::invalid_output(format!(
                "Resolved offset is negative: {}",
                resolved.offset_secs
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
    use crate::models::{CorrelationResult, JobSpec, SearchWindow, SourceClip, Timestamp};
    use crate::orchestrator::types::CorrelationOutput;
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
            Arc::new(RunLogger::new("resolve_test", dir, LogConfig::default(), None).unwrap());
        Context::new(spec, settings, "resolve_test", logger)
    }

    #[test]
    fn resolves_labeled_result_using_window_starts() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        let mut state = JobState::new("resolve_test");
        state.correlation = Some(CorrelationOutput {
            result: CorrelationResult::Labeled {
                leader: ClipRole::First,
                lag_secs: 12.5,
            },
        });

        let outcome = ResolveStep::new().execute(&ctx, &mut state).unwrap();
        assert_eq!(outcome, StepOutcome::Success);

        let resolved = state.resolved.unwrap();
        assert_eq!(resolved.leader, ClipRole::First);
        assert_eq!(resolved.follower, ClipRole::Second);
        // |845 - 3285 - 12.5|
        assert!((resolved.offset_secs - 2452.5).abs() < 1e-9);
    }

    #[test]
    fn resolves_signed_result_ignoring_window_starts() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        let mut state = JobState::new("resolve_test");
        state.correlation = Some(CorrelationOutput {
            result: CorrelationResult::Signed { offset_secs: -7.2 },
        });

        ResolveStep::new().execute(&ctx, &mut state).unwrap();

        let resolved = state.resolved.unwrap();
        assert_eq!(resolved.leader, ClipRole::First);
        assert!((resolved.offset_secs - 7.2).abs() < 1e-9);
    }

    #[test]
    fn skips_when_combined_output_exists() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        std::fs::write(&ctx.output_path, b"muxed").unwrap();

        let mut state = JobState::new("resolve_test");
        let outcome = ResolveStep::new().execute(&ctx, &mut state).unwrap();

        assert!(matches!(outcome, StepOutcome::Skipped(_)));
        assert!(!state.has_resolution());
    }

    #[test]
    fn fails_without_correlation_state() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        let mut state = JobState::new("resolve_test");
        let result = ResolveStep::new().execute(&ctx, &mut state);

        assert!(matches!(result, Err(StepError::PreconditionFailed(_))));
    }
}
