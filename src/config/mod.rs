//! Configuration management for vodsync.
//!
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Validation on load with automatic defaults
//!
//! # Example
//!
//! ```no_run
//! use vodsync::config::ConfigManager;
//!
//! let mut config = ConfigManager::new("vodsync.toml");
//! config.load_or_create().unwrap();
//! println!("Work dir: {}", config.settings().paths.work_dir);
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    AnalysisSettings, ConfigSection, LoggingSettings, OracleSettings, PathSettings,
    PlaybackSettings, Settings, SourcesSettings,
};
