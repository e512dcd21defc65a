//! Pipeline orchestrator for running a sync job.
//!
//! A run is a sequence of steps that validate, execute, and record
//! their results:
//!
//! ```text
//! Pipeline
//!     ├── Step: Extract    (clips -> WAVs, cached on disk)
//!     ├── Step: Correlate  (external oracle, once per run)
//!     ├── Step: Resolve    (pure offset arithmetic)
//!     ├── Step: Mux        (ffmpeg, skipped when output exists)
//!     └── Step: Play       (optional)
//! ```
//!
//! The first failure aborts the run. Intermediate files double as
//! checkpoints: a re-run with the combined output already on disk only
//! launches playback.

mod errors;
mod pipeline;
mod step;
pub mod steps;
mod types;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{CancelHandle, Pipeline, PipelineRunResult};
pub use step::PipelineStep;
pub use steps::{CorrelateStep, ExtractStep, MuxStep, PlayStep, ResolveStep};
pub use types::{
    Context, CorrelationOutput, ExtractOutput, JobState, MuxOutput, ProgressCallback, StepOutcome,
};

/// Create the standard pipeline in the correct order.
///
/// Playback is optional; everything else always runs (or skips itself
/// against the on-disk artifacts).
pub fn create_standard_pipeline(include_playback: bool) -> Pipeline {
    let pipeline = Pipeline::new()
        .with_step(ExtractStep::new())
        .with_step(CorrelateStep::new())
        .with_step(ResolveStep::new())
        .with_step(MuxStep::new());

    if include_playback {
        pipeline.with_step(PlayStep::new())
    } else {
        pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_pipeline_has_expected_steps() {
        let pipeline = create_standard_pipeline(true);
        assert_eq!(
            pipeline.step_names(),
            vec!["Extract", "Correlate", "Resolve", "Mux", "Play"]
        );

        let pipeline = create_standard_pipeline(false);
        assert_eq!(
            pipeline.step_names(),
            vec!["Extract", "Correlate", "Resolve", "Mux"]
        );
    }
}
