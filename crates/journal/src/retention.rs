//! Retention cap for the global checkpoint list

use serde::{Deserialize, Serialize};

/// Default number of checkpoints kept across all files and branches
pub const DEFAULT_MAX_CHECKPOINTS: usize = 50;

/// Retention policy configuration
///
/// Eviction is global FIFO: once the cap is exceeded the oldest checkpoint
/// goes, whatever file or branch it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Number of checkpoints to keep (default: 50, minimum 1)
    pub max_checkpoints: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_checkpoints: DEFAULT_MAX_CHECKPOINTS,
        }
    }
}

impl RetentionPolicy {
    pub fn new(max_checkpoints: usize) -> Self {
        Self {
            max_checkpoints: max_checkpoints.max(1),
        }
    }

    /// How many of the oldest checkpoints must go for `len` to fit
    pub fn overflow(&self, len: usize) -> usize {
        len.saturating_sub(self.max_checkpoints.max(1))
    }
}
