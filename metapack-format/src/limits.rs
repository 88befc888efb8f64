//! Decode limits

use serde::{Deserialize, Serialize};

/// Limits guarding the decoder against hostile element counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum element count accepted for a single sequence (default: 16 Mi)
    pub max_sequence_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_sequence_len: 16 * 1024 * 1024,
        }
    }
}
