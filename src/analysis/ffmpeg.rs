//! FFmpeg audio clip extraction.
//!
//! Extracts the correlation window from a source video into a PCM WAV
//! file the oracle can read. Stream copy is never used here; the oracle
//! wants raw PCM.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::types::{AnalysisError, AnalysisResult};

/// Default sample rate for extracted clips.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default channel count for extracted clips.
pub const DEFAULT_CHANNELS: u32 = 2;

/// Parameters for one clip extraction.
#[derive(Debug, Clone)]
pub struct ClipExtraction {
    /// Source video file.
    pub input_path: PathBuf,
    /// Window start within the source, in seconds.
    pub start_secs: f64,
    /// Window duration in seconds.
    pub duration_secs: f64,
    /// Output sample rate.
    pub sample_rate: u32,
    /// Output channel count.
    pub channels: u32,
    /// Destination WAV path.
    pub output_path: PathBuf,
}

impl ClipExtraction {
    /// Build the ffmpeg argument list for this extraction.
    fn build_args(&self) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-ss".to_string(),
            format!("{:.3}", self.start_secs),
            "-t".to_string(),
            format!("{:.3}", self.duration_secs),
            "-i".to_string(),
            self.input_path.to_string_lossy().to_string(),
            "-vn".to_string(),
            "-ac".to_string(),
            self.channels.to_string(),
            "-ar".to_string(),
            self.sample_rate.to_string(),
            "-acodec".to_string(),
            "pcm_s16le".to_string(),
            self.output_path.to_string_lossy().to_string(),
        ]
    }
}

/// Extract an audio window from a video file into a WAV.
///
/// Blocking call; returns once ffmpeg exits. A non-zero exit status is
/// fatal and carries the stderr tail in the error.
pub fn extract_clip(extraction: &ClipExtraction) -> AnalysisResult<()> {
    if !extraction.input_path.exists() {
        return Err(AnalysisError::SourceNotFound(
            extraction.input_path.display().to_string(),
        ));
    }

    let args = extraction.build_args();
    tracing::debug!("Running ffmpeg: {:?}", args);

    let output = Command::new("ffmpeg")
        .args(&args)
        .output()
        .map_err(|e| AnalysisError::ToolSpawn {
            tool: "ffmpeg".to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(AnalysisError::ToolFailed {
            tool: "ffmpeg".to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    if !extraction.output_path.exists() {
        return Err(AnalysisError::Parse {
            what: "ffmpeg output".to_string(),
            message: format!(
                "extraction produced no file at {}",
                extraction.output_path.display()
            ),
        });
    }

    Ok(())
}

/// Get the duration of a media file in seconds using ffprobe.
pub fn get_duration(input_path: &Path) -> AnalysisResult<f64> {
    if !input_path.exists() {
        return Err(AnalysisError::SourceNotFound(
            input_path.display().to_string(),
        ));
    }

    let output = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-show_entries")
        .arg("format=duration")
        .arg("-of")
        .arg("default=noprint_wrappers=1:nokey=1")
        .arg(input_path)
        .output()
        .map_err(|e| AnalysisError::ToolSpawn {
            tool: "ffprobe".to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(AnalysisError::ToolFailed {
            tool: "ffprobe".to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let duration_str = String::from_utf8_lossy(&output.stdout);
    duration_str
        .trim()
        .parse::<f64>()
        .map_err(|e| AnalysisError::Parse {
            what: "media duration".to_string(),
            message: e.to_string(),
        })
}
