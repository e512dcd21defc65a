//! Playback launch: keymap generation and player invocation.
//!
//! The combined container carries both video streams; the generated
//! keymap lets the viewer flip between them while audio keeps playing.
//! Playback is a blocking call; the run ends when the player exits.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Errors launching the playback tool.
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Failed to write keymap: {0}")]
    Keymap(#[from] io::Error),

    #[error("Failed to launch {player}: {message}")]
    Launch { player: String, message: String },
}

/// Result type for playback operations.
pub type PlaybackResult<T> = Result<T, PlaybackError>;

/// Write the stream-switch keymap consumed by the player at launch.
///
/// mpv input.conf syntax: one binding per line. Stream indices are
/// 1-based; group 0's video is stream 1, group 1's is stream 2.
pub fn write_keymap(path: &Path, key_first: &str, key_second: &str) -> PlaybackResult<()> {
    let content = format!(
        "# Switch between the two embedded video streams\n{} set vid 1\n{} set vid 2\n",
        key_first, key_second
    );
    fs::write(path, content)?;
    Ok(())
}

/// Launch parameters for the playback tool.
#[derive(Debug, Clone)]
pub struct PlayerLaunch {
    /// Player program name or path.
    pub program: String,
    /// Resume from the last position and persist it on exit.
    pub resume: bool,
    /// Path of the generated keymap.
    pub keymap_path: PathBuf,
    /// The file to play.
    pub media_path: PathBuf,
}

impl PlayerLaunch {
    /// Build the player argument list.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.resume {
            args.push("--save-position-on-quit".to_string());
        }
        args.push(format!("--input-conf={}", self.keymap_path.display()));
        args.push(self.media_path.to_string_lossy().to_string());
        args
    }

    /// Launch the player and block until it exits.
    ///
    /// The player inherits the terminal; returns its exit code.
    pub fn launch(&self) -> PlaybackResult<i32> {
        let args = self.build_args();
        tracing::debug!("Launching player: {} {:?}", self.program, args);

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|e| PlaybackError::Launch {
                player: self.program.clone(),
                message: e.to_string(),
            })?;

        Ok(status.code().unwrap_or(-1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn keymap_binds_both_streams() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.conf");

        write_keymap(&path, "F1", "F2").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("F1 set vid 1"));
        assert!(content.contains("F2 set vid 2"));
    }

    #[test]
    fn launch_args_include_resume_and_keymap() {
        let launch = PlayerLaunch {
            program: "mpv".to_string(),
            resume: true,
            keymap_path: PathBuf::from("/work/input.conf"),
            media_path: PathBuf::from("/out/combined.mkv"),
        };

        let args = launch.build_args();
        assert_eq!(args[0], "--save-position-on-quit");
        assert_eq!(args[1], "--input-conf=/work/input.conf");
        assert_eq!(args.last().map(String::as_str), Some("/out/combined.mkv"));
    }

    #[test]
    fn launch_args_without_resume() {
        let launch = PlayerLaunch {
            program: "mpv".to_string(),
            resume: false,
            keymap_path: PathBuf::from("input.conf"),
            media_path: PathBuf::from("combined.mkv"),
        };

        let args = launch.build_args();
        assert!(!args.contains(&"--save-position-on-quit".to_string()));
    }

    #[test]
    fn launch_fails_for_missing_player() {
        let launch = PlayerLaunch {
            program: "/nonexistent/player".to_string(),
            resume: false,
            keymap_path: PathBuf::from("input.conf"),
            media_path: PathBuf::from("combined.mkv"),
        };

        assert!(matches!(
            launch.launch(),
            Err(PlaybackError::Launch { .. })
        ));
    }
}
