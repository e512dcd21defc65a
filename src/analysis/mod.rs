//! Audio analysis: clip extraction and correlation oracle invocation.
//!
//! Nothing in here does signal processing. The correlation itself is
//! delegated to an external oracle command; this module extracts the
//! audio windows it needs, runs it, and parses what it prints.

mod ffmpeg;
mod oracle;
mod types;

pub use ffmpeg::{
    extract_clip, get_duration, ClipExtraction, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE,
};
pub use oracle::{parse_oracle_output, OracleCommand};
pub use types::{AnalysisError, AnalysisResult};
