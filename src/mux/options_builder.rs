//! ffmpeg mux command options builder.
//!
//! Builds the token list for the final mux: leader clip as stream-group
//! 0, follower clip as stream-group 1 with `-itsoffset` applied, all
//! streams mapped, codecs copied.

use std::path::Path;

/// Builder for the ffmpeg mux command line.
///
/// Generates a list of string tokens ready to pass to ffmpeg. The
/// `-itsoffset` option must precede the follower's `-i`; ffmpeg applies
/// it to the next input only.
pub struct MuxOptionsBuilder<'a> {
    leader_path: &'a Path,
    follower_path: &'a Path,
    offset_secs: f64,
    output_path: &'a Path,
}

impl<'a> MuxOptionsBuilder<'a> {
    /// Create a new options builder.
    ///
    /// `offset_secs` is the already-resolved, non-negative follower
    /// offset.
    pub fn new(
        leader_path: &'a Path,
        follower_path: &'a Path,
        offset_secs: f64,
        output_path: &'a Path,
    ) -> Self {
        Self {
            leader_path,
            follower_path,
            offset_secs,
            output_path,
        }
    }

    /// Build the complete ffmpeg token list.
    pub fn build(&self) -> Vec<String> {
        let mut tokens = Vec::new();

        // Leader: stream-group 0, no offset
        tokens.push("-i".to_string());
        tokens.push(self.leader_path.to_string_lossy().to_string());

        // Follower: stream-group 1, shifted by the resolved offset
        tokens.push("-itsoffset".to_string());
        tokens.push(format!("{:.3}", self.offset_secs));
        tokens.push("-i".to_string());
        tokens.push(self.follower_path.to_string_lossy().to_string());

        // Map all streams from both groups, stream copy only
        tokens.push("-map".to_string());
        tokens.push("0".to_string());
        tokens.push("-map".to_string());
        tokens.push("1".to_string());
        tokens.push("-c".to_string());
        tokens.push("copy".to_string());

        tokens.push(self.output_path.to_string_lossy().to_string());

        tokens
    }
}
