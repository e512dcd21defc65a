//! Centralized offset resolution logic.
//!
//! This module is the single place where correlation output is turned
//! into a mux offset. All sign handling happens here - no scattered
//! negation or clip swapping elsewhere.
//!
//! # Resolution Rules
//!
//! ## Labeled oracle output
//!
//! The oracle names a leader clip and a signed lag. The follower offset
//! is derived from the window start times of both clips:
//!
//! ```text
//! leader = first:  offset = |start_first - start_second - lag|
//! leader = second: offset = |start_second - start_first - lag|
//! ```
//!
//! The raw difference can come out negative when the oracle's sign
//! convention is inverted relative to the window ordering; the absolute
//! value is taken so the invariant `offset >= 0` holds before the value
//! reaches the mux step.
//!
//! ## Signed oracle output
//!
//! The oracle reports one signed offset relative to the fixed
//! (first, second) ordering:
//!
//! - negative: second follows first, offset negated
//! - positive: roles swap, first follows second, offset used directly
//! - zero: second follows first with no shift

use thiserror::Error;

use crate::models::{ClipRole, CorrelationResult, ResolvedOffset};

/// Errors turning oracle output into a resolved offset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The oracle named a reference clip that matches neither input.
    /// Configuration/tooling mismatch - fatal, never retried.
    #[error("Oracle named unrecognized reference clip '{label}'")]
    UnrecognizedReference { label: String },

    /// The oracle output could not be parsed as either contract.
    #[error("Could not parse oracle output: '{line}'")]
    MalformedOutput { line: String },
}

/// Result type for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Resolve a correlation result into leader/follower ordering and a
/// non-negative follower offset.
///
/// `start_first` and `start_second` are the absolute positions (seconds)
/// at which each clip's correlation window begins within its own source
/// video. They only matter for labeled output; the signed contract
/// already encodes the relative position.
pub fn resolve(
    start_first: f64,
    start_second: f64,
    result: CorrelationResult,
) -> ResolvedOffset {
    match result {
        CorrelationResult::Labeled { leader, lag_secs } => {
            resolve_labeled(start_first, start_second, leader, lag_secs)
        }
        CorrelationResult::Signed { offset_secs } => resolve_signed(offset_secs),
    }
}

/// Resolve the labeled oracle contract.
///
/// The reported leader's timeline is the baseline; the other clip is
/// shifted by the window-start difference minus the reported lag.
pub fn resolve_labeled(
    start_first: f64,
    start_second: f64,
    leader: ClipRole,
    lag_secs: f64,
) -> ResolvedOffset {
    let raw = match leader {
        ClipRole::First => start_first - start_second - lag_secs,
        ClipRole::Second => start_second - start_first - lag_secs,
    };

    ResolvedOffset::new(leader, raw.abs())
}

/// Resolve the single-signed oracle contract.
///
/// The sign picks the follower: negative keeps the (first, second)
/// ordering, positive swaps it.
pub fn resolve_signed(offset_secs: f64) -> ResolvedOffset {
    if offset_secs > 0.0 {
        ResolvedOffset::new(ClipRole::Second, offset_secs)
    } else {
        ResolvedOffset::new(ClipRole::First, -offset_secs)
    }
}
