//! vodsync binary entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context as _};
use clap::Parser;

use vodsync::config::{ConfigManager, Settings};
use vodsync::logging::{self, ConsoleCallback, LogConfig, LogLevel, RunLogger};
use vodsync::models::{SourceClip, Timestamp};
use vodsync::orchestrator::{create_standard_pipeline, Context, JobState};

/// Find the offset between two recordings of the same session and mux
/// them into one container for synchronized playback.
#[derive(Parser, Debug)]
#[command(name = "vodsync", version)]
struct Cli {
    /// First source video (overrides [sources.first] in the config)
    first: Option<PathBuf>,

    /// Second source video (overrides [sources.second] in the config)
    second: Option<PathBuf>,

    /// Correlation window start in the first video, e.g. '14m5s' or '00:14:05'
    #[arg(long, value_name = "TIME")]
    start1: Option<Timestamp>,

    /// Correlation window start in the second video
    #[arg(long, value_name = "TIME")]
    start2: Option<Timestamp>,

    /// Search window duration in seconds
    #[arg(long, value_name = "SECONDS")]
    search_dur: Option<f64>,

    /// Config file path
    #[arg(long, default_value = "vodsync.toml")]
    config: PathBuf,

    /// Skip playback after muxing
    #[arg(long)]
    no_play: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Fold command-line overrides into the loaded settings.
fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(path) = &cli.first {
        let start = cli
            .start1
            .or_else(|| settings.sources.first.as_ref().map(|c| c.start))
            .unwrap_or_default();
        settings.sources.first = Some(SourceClip::new(path.clone(), start));
    } else if let Some(start) = cli.start1 {
        if let Some(clip) = settings.sources.first.as_mut() {
            clip.start = start;
        }
    }

    if let Some(path) = &cli.second {
        let start = cli
            .start2
            .or_else(|| settings.sources.second.as_ref().map(|c| c.start))
            .unwrap_or_default();
        settings.sources.second = Some(SourceClip::new(path.clone(), start));
    } else if let Some(start) = cli.start2 {
        if let Some(clip) = settings.sources.second.as_mut() {
            clip.start = start;
        }
    }

    if let Some(dur) = cli.search_dur {
        settings.analysis.search_window_secs = dur;
    }

    if cli.no_play {
        settings.playback.enabled = false;
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_tracing(if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    });

    if cli.first.is_some() != cli.second.is_some() {
        bail!("Provide both source paths or neither (sources can also live in the config file)");
    }

    let mut manager = ConfigManager::new(&cli.config);
    manager
        .load_or_create()
        .with_context(|| format!("loading config {}", cli.config.display()))?;

    apply_cli_overrides(manager.settings_mut(), &cli);

    let settings = manager.settings().clone();
    let job_spec = settings.job_spec().ok_or_else(|| {
        anyhow!(
            "No sources configured; edit [sources] in {} or pass two paths",
            cli.config.display()
        )
    })?;

    manager
        .ensure_dirs_exist()
        .context("creating work/logs directories")?;

    let log_config = LogConfig {
        level: if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        },
        compact: settings.logging.compact && !cli.verbose,
        progress_step: settings.logging.progress_step,
        error_tail: settings.logging.error_tail,
        show_timestamps: settings.logging.show_timestamps,
    };

    let console: ConsoleCallback = Box::new(|line| eprintln!("{}", line));
    let job_name = job_spec.job_name();
    let logger = Arc::new(
        RunLogger::new(job_name.as_str(), settings.logs_dir(), log_config, Some(console))
            .context("creating run logger")?,
    );

    logger.info(&format!("vodsync v{}", vodsync::version()));
    logger.info(&format!(
        "First:  {} (window @ {})",
        job_spec.first.path.display(),
        job_spec.first.start
    ));
    logger.info(&format!(
        "Second: {} (window @ {})",
        job_spec.second.path.display(),
        job_spec.second.start
    ));

    let include_playback = settings.playback.enabled;
    let ctx = Context::new(job_spec, settings, job_name.clone(), Arc::clone(&logger));
    let mut state = JobState::new(job_name.as_str());

    let pipeline = create_standard_pipeline(include_playback);
    let result = pipeline.run(&ctx, &mut state)?;

    logger.info(&format!(
        "Run finished: {} step(s) completed, {} skipped",
        result.steps_completed.len(),
        result.steps_skipped.len()
    ));
    if let Some(resolved) = &state.resolved {
        logger.info(&format!(
            "Offset applied: {:.3}s on the {} source",
            resolved.offset_secs, resolved.follower
        ));
    }

    Ok(())
}
