//! Core enums used throughout the application.

use serde::{Deserialize, Serialize};

/// Which of the two configured source clips a value refers to.
///
/// The first clip is the one named first in configuration (or on the
/// command line); ordering is fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipRole {
    First,
    Second,
}

impl ClipRole {
    /// Get the opposite role.
    pub fn other(&self) -> Self {
        match self {
            ClipRole::First => ClipRole::Second,
            ClipRole::Second => ClipRole::First,
        }
    }
}

impl std::fmt::Display for ClipRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipRole::First => write!(f, "first"),
            ClipRole::Second => write!(f, "second"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_flips_role() {
        assert_eq!(ClipRole::First.other(), ClipRole::Second);
        assert_eq!(ClipRole::Second.other(), ClipRole::First);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&ClipRole::First).unwrap();
        assert_eq!(json, "\"first\"");
    }
}
