//! Correlation oracle invocation and output parsing.
//!
//! The oracle is an external command that compares two short audio
//! clips and reports how far apart they are. Two output contracts are
//! in the wild:
//!
//! - a comma-separated pair `referenceFileName,lagSeconds` naming which
//!   clip it treated as the reference, or
//! - a single signed float relative to the argument order.
//!
//! Both are accepted; the last non-empty stdout line decides.

use std::path::Path;
use std::process::Command;

use crate::models::{ClipRole, CorrelationResult};
use crate::mux::{ResolveError, ResolveResult};

use super::types::{AnalysisError, AnalysisResult};

/// Command template for the external correlation oracle.
#[derive(Debug, Clone)]
pub struct OracleCommand {
    /// Program name or path.
    pub program: String,
    /// Search-duration bound handed to the oracle, in seconds.
    pub search_duration_secs: f64,
    /// Maximum lag the oracle should consider, in seconds.
    pub max_lag_secs: f64,
    /// Ask the oracle to noise-filter the clips first.
    pub denoise: bool,
    /// Suppress oracle progress chatter; only the result is printed.
    pub quiet: bool,
}

impl OracleCommand {
    /// Build the oracle argument list for the two extracted clips.
    pub fn build_args(&self, first_wav: &Path, second_wav: &Path) -> Vec<String> {
        let mut args = vec![
            first_wav.to_string_lossy().to_string(),
            second_wav.to_string_lossy().to_string(),
            "--search-duration".to_string(),
            format!("{:.1}", self.search_duration_secs),
            "--max-lag".to_string(),
            format!("{:.1}", self.max_lag_secs),
        ];
        if self.denoise {
            args.push("--denoise".to_string());
        }
        if self.quiet {
            args.push("--quiet".to_string());
        }
        args
    }

    /// Run the oracle on two extracted clips and parse its verdict.
    ///
    /// Blocking call. Exactly one invocation per run; the caller is
    /// responsible for any caching.
    pub fn run(&self, first_wav: &Path, second_wav: &Path) -> AnalysisResult<CorrelationResult> {
        for wav in [first_wav, second_wav] {
            if !wav.exists() {
                return Err(AnalysisError::SourceNotFound(wav.display().to_string()));
            }
        }

        let args = self.build_args(first_wav, second_wav);
        tracing::debug!("Running oracle: {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| AnalysisError::ToolSpawn {
                tool: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(AnalysisError::ToolFailed {
                tool: self.program.clone(),
                exit_code: output.status.code().unwrap_or(-1),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_oracle_output(&stdout, first_wav, second_wav)?)
    }
}

/// Parse oracle stdout into a correlation result.
///
/// Takes the last non-empty line; earlier lines are progress chatter.
/// A line containing a comma is the labeled contract, anything else
/// must parse as a bare signed float.
pub fn parse_oracle_output(
    stdout: &str,
    first_wav: &Path,
    second_wav: &Path,
) -> ResolveResult<CorrelationResult> {
    let line = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| ResolveError::MalformedOutput {
            line: String::new(),
        })?;

    if line.contains(',') {
        parse_labeled_line(line, first_wav, second_wav)
    } else {
        let offset_secs = line
            .parse::<f64>()
            .map_err(|_| ResolveError::MalformedOutput {
                line: line.to_string(),
            })?;
        Ok(CorrelationResult::Signed { offset_secs })
    }
}

/// Parse the `referenceFileName,lagSeconds` contract.
fn parse_labeled_line(
    line: &str,
    first_wav: &Path,
    second_wav: &Path,
) -> ResolveResult<CorrelationResult> {
    let trimmed = line.trim_start_matches('(').trim_end_matches(')');
    let (label, lag) = trimmed
        .rsplit_once(',')
        .ok_or_else(|| ResolveError::MalformedOutput {
            line: line.to_string(),
        })?;

    let label = label.trim();
    let lag_secs = lag
        .trim()
        .parse::<f64>()
        .map_err(|_| ResolveError::MalformedOutput {
            line: line.to_string(),
        })?;

    let leader = if label_matches(label, first_wav) {
        ClipRole::First
    } else if label_matches(label, second_wav) {
        ClipRole::Second
    } else {
        return Err(ResolveError::UnrecognizedReference {
            label: label.to_string(),
        });
    };

    Ok(CorrelationResult::Labeled { leader, lag_secs })
}

/// Whether an oracle-reported label names the given clip file.
///
/// Oracles echo the path they were given, just the file name, or the
/// bare stem; all three are accepted.
fn label_matches(label: &str, clip: &Path) -> bool {
    let label_path = Path::new(label);
    let label_name = label_path.file_name().map(|n| n.to_string_lossy());
    let label_stem = label_path.file_stem().map(|n| n.to_string_lossy());

    let clip_name = clip.file_name().map(|n| n.to_string_lossy());
    let clip_stem = clip.file_stem().map(|n| n.to_string_lossy());

    (label_name.is_some() && label_name == clip_name)
        || (label_stem.is_some() && label_stem == clip_stem)
}
