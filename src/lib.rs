//! vodsync - sync two independently recorded videos.
//!
//! Detects the time offset between the audio tracks of two recordings
//! (e.g., two streamers' VODs of a shared session) via an external
//! correlation oracle, muxes both into a single multi-track container
//! with ffmpeg, and opens the result in a player with stream-switch
//! keybindings.
//!
//! All heavy lifting happens in external tools; this crate does
//! argument marshaling, offset bookkeeping, file-existence checks, and
//! command composition.

pub mod analysis;
pub mod config;
pub mod logging;
pub mod models;
pub mod mux;
pub mod orchestrator;
pub mod playback;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
