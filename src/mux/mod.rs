//! Muxing module for ffmpeg integration.
//!
//! - **offset_resolver**: turns a raw correlation result into the leader/
//!   follower ordering and the non-negative offset applied at mux time
//! - **options_builder**: converts a resolved offset into ffmpeg command
//!   tokens

mod offset_resolver;
mod options_builder;

pub use offset_resolver::{resolve, resolve_labeled, resolve_signed, ResolveError, ResolveResult};
pub use options_builder::MuxOptionsBuilder;
