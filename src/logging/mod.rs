//! Logging infrastructure for vodsync.
//!
//! - A global `tracing` subscriber for application-level diagnostics
//! - A per-run logger writing to a file under the logs directory, with
//!   phase/command prefixes, compact-mode filtering of tool chatter,
//!   and a tail buffer replayed when an external tool fails

mod run_logger;
mod types;

pub use run_logger::RunLogger;
pub use types::{ConsoleCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Respects RUST_LOG, falling back to the provided default level.
/// Should be called once at startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Convert LogLevel to a filter string.
fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}
