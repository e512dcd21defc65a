//! Error types for the analysis module.

use thiserror::Error;

use crate::mux::ResolveError;

/// Errors from extraction and oracle invocation.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A source file does not exist.
    #[error("Source file not found: {0}")]
    SourceNotFound(String),

    /// An external tool could not be started.
    #[error("Failed to run {tool}: {message}")]
    ToolSpawn { tool: String, message: String },

    /// An external tool ran but exited with a failure status.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    ToolFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// Tool output could not be interpreted.
    #[error("Failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    /// Oracle output did not resolve to a usable correlation result.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
