//! Pipeline step implementations.

mod correlate;
mod extract;
mod mux;
mod play;
mod resolve;

pub use correlate::CorrelateStep;
pub use extract::ExtractStep;
pub use mux::MuxStep;
pub use play::PlayStep;
pub use resolve::ResolveStep;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::logging::{LogConfig, RunLogger};
    use crate::models::{JobSpec, SearchWindow, SourceClip, Timestamp};
    use crate::orchestrator::{Context, JobState, Pipeline};
    use std::sync::Arc;

    // Re-running with the combined output present must not touch any
    // external tool: every processing step reports Skipped.
    #[test]
    fn rerun_with_existing_output_skips_all_processing() {
        let dir = tempfile::tempdir().unwrap();

        let mut settings = Settings::default();
        settings.paths.work_dir = dir.path().join("work").to_string_lossy().to_string();
        settings.paths.output_file = dir
            .path()
            .join("combined.mkv")
            .to_string_lossy()
            .to_string();

        // Sources and output all present
        std::fs::write(dir.path().join("a.mkv"), b"x").unwrap();
        std::fs::write(dir.path().join("b.mkv"), b"x").unwrap();
        std::fs::write(dir.path().join("combined.mkv"), b"muxed").unwrap();

        let spec = JobSpec::new(
            SourceClip::new(dir.path().join("a.mkv"), Timestamp::new(0, 14, 5)),
            SourceClip::new(dir.path().join("b.mkv"), Timestamp::new(0, 54, 45)),
            SearchWindow::default(),
        );

        let logger = Arc::new(
            RunLogger::new("rerun_test", dir.path(), LogConfig::default(), None).unwrap(),
        );
        let ctx = Context::new(spec, settings, "rerun_test", logger);
        let mut state = JobState::new("rerun_test");

        let pipeline = Pipeline::new()
            .with_step(ExtractStep::new())
            .with_step(CorrelateStep::new())
            .with_step(ResolveStep::new())
            .with_step(MuxStep::new());

        let result = pipeline.run(&ctx, &mut state).unwrap();

        assert!(result.steps_completed.is_empty());
        assert_eq!(
            result.steps_skipped,
            vec!["Extract", "Correlate", "Resolve", "Mux"]
        );
    }

    // When resolution fails, the run aborts before any mux attempt.
    #[test]
    fn failed_resolution_prevents_mux() {
        use crate::orchestrator::PipelineError;

        let dir = tempfile::tempdir().unwrap();

        let mut settings = Settings::default();
        settings.paths.work_dir = dir.path().join("work").to_string_lossy().to_string();
        settings.paths.output_file = dir
            .path()
            .join("combined.mkv")
            .to_string_lossy()
            .to_string();

        std::fs::write(dir.path().join("a.mkv"), b"x").unwrap();
        std::fs::write(dir.path().join("b.mkv"), b"x").unwrap();

        let spec = JobSpec::new(
            SourceClip::new(dir.path().join("a.mkv"), Timestamp::default()),
            SourceClip::new(dir.path().join("b.mkv"), Timestamp::default()),
            SearchWindow::default(),
        );

        let logger = Arc::new(
            RunLogger::new("abort_test", dir.path(), LogConfig::default(), None).unwrap(),
        );
        let ctx = Context::new(spec, settings, "abort_test", logger);
        // No correlation result recorded, so Resolve cannot proceed
        let mut state = JobState::new("abort_test");

        let pipeline = Pipeline::new()
            .with_step(ResolveStep::new())
            .with_step(MuxStep::new());

        let result = pipeline.run(&ctx, &mut state);

        assert!(matches!(
            result,
            Err(PipelineError::StepFailed { ref step_name, .. }) if step_name == "Resolve"
        ));
        assert!(state.mux.is_none());
        assert!(!ctx.output_path.exists());
    }
}
