//! Play step - opens the combined container in the configured player.
//!
//! A non-zero player exit is a warning, not a run failure: the combined
//! container already exists by the time this step runs.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, StepOutcome};
use crate::playback::{write_keymap, PlayerLaunch};

/// Play step launching the configured player on the combined output.
pub struct PlayStep;

impl PlayStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlayStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for PlayStep {
    fn name(&self) -> &str {
        "Play"
    }

    fn description(&self) -> &str {
        "Open the combined container in the playback tool"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.output_exists() {
            return Err(StepError::file_not_found(
                ctx.output_path.display().to_string(),
            ));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, _state: &mut JobState) -> StepResult<StepOutcome> {
        let playback = &ctx.settings.playback;

        let keymap_path = ctx.keymap_path();
        std::fs::create_dir_all(&ctx.work_dir)
            .map_err(|e| StepError::io_error("creating work directory", e))?;
        write_keymap(&keymap_path, &playback.key_first, &playback.key_second)
            .map_err(|e| StepError::io_error("writing keymap", std::io::Error::other(e)))?;

        let launch = PlayerLaunch {
            program: playback.player.clone(),
            resume: playback.resume,
            keymap_path,
            media_path: ctx.output_path.clone(),
        };

        ctx.logger
            .command(&format!("{} {}", launch.program, launch.build_args().join(" ")));

        match launch.launch() {
            Ok(0) => {}
            Ok(code) => {
                ctx.logger
                    .warn(&format!("Player exited with code {}", code));
            }
            Err(e) => {
                return Err(StepError::io_error(
                    "launching player",
                    std::io::Error::other(e.to_string()),
                ));
            }
        }

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, _state: &JobState) -> StepResult<()> {
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
            Arc::new(RunLogger::new("play_test", dir, LogConfig::default(), None).unwrap());
        Context::new(spec, settings, "play_test", logger)
    }

    #[test]
    fn validate_input_requires_combined_output() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        let result = PlayStep::new().validate_input(&ctx);
        assert!(matches!(result, Err(StepError::FileNotFound { .. })));

        std::fs::write(&ctx.output_path, b"muxed").unwrap();
        assert!(PlayStep::new().validate_input(&ctx).is_ok());
    }
}
