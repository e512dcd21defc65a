//! Sync-related data structures (correlation results, resolved offsets).

use serde::{Deserialize, Serialize};

use super::enums::ClipRole;

/// Raw result reported by the correlation oracle.
///
/// Oracles speak one of two contracts: a labeled pair naming the clip
/// whose window is the reference plus a signed lag, or a bare signed
/// offset relative to the fixed (first, second) ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CorrelationResult {
    /// The oracle named a reference clip and reported how far the other
    /// clip's audio lags behind it.
    Labeled {
        leader: ClipRole,
        lag_secs: f64,
    },
    /// The oracle reported a single signed offset for the fixed
    /// (first, second) ordering.
    Signed {
        offset_secs: f64,
    },
}

/// The outcome of offset resolution: which clip leads, which follows,
/// and the non-negative offset to apply to the follower when muxing.
///
/// `offset_secs >= 0` always; sign and role swap are resolved before a
/// value of this type exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedOffset {
    /// The clip whose timeline is the alignment baseline.
    pub leader: ClipRole,
    /// The clip that gets time-shifted to align with the leader.
    pub follower: ClipRole,
    /// Offset in seconds applied to the follower. Never negative.
    pub offset_secs: f64,
}

impl ResolvedOffset {
    /// Create a resolved offset with the follower derived from the leader.
    ///
    /// Callers must hand in an already-normalized offset.
    pub fn new(leader: ClipRole, offset_secs: f64) -> Self {
        debug_assert!(offset_secs >= 0.0, "offset must be normalized before construction");
        Self {
            leader,
            follower: leader.other(),
            offset_secs,
        }
    }
}
