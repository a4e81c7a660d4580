//! Engine configuration

use crate::persist::SaveMode;
use crate::retention::{RetentionPolicy, DEFAULT_MAX_CHECKPOINTS};
use serde::{Deserialize, Serialize};

/// Fixed logical key the full state is stored under
pub const DEFAULT_STORAGE_KEY: &str = "checkpoints";

/// Valid range for `max_checkpoints`
pub const MAX_CHECKPOINTS_RANGE: std::ops::RangeInclusive<usize> = 1..=100_000;

/// Checkpoint engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Global checkpoint cap (default: 50)
    pub max_checkpoints: usize,
    /// Whether non-manual checkpoints are recorded (default: true)
    pub auto_save: bool,
    /// Key the state is persisted under (default: "checkpoints")
    pub storage_key: String,
    /// How saves are spread across backends (default: mirror)
    pub save_mode: SaveMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_checkpoints: DEFAULT_MAX_CHECKPOINTS,
            auto_save: true,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            save_mode: SaveMode::default(),
        }
    }
}

impl EngineConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), String> {
        if !MAX_CHECKPOINTS_RANGE.contains(&self.max_checkpoints) {
            return Err(format!(
                "max_checkpoints must be between {} and {} (got {})",
                MAX_CHECKPOINTS_RANGE.start(),
                MAX_CHECKPOINTS_RANGE.end(),
                self.max_checkpoints
            ));
        }
        if self.storage_key.trim().is_empty() {
            return Err("storage_key must not be empty".to_string());
        }
        Ok(())
    }

    pub fn retention(&self) -> RetentionPolicy {
        RetentionPolicy::new(self.max_checkpoints)
    }
}
