//! User configuration file
//!
//! Read from `$SNAP_CONFIG` if set, otherwise from
//! `<config dir>/snapline/config.toml`. A missing file means defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use snapline_journal::EngineConfig;
use std::path::PathBuf;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "SNAP_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub engine: EngineConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Where the database and the JSON backup live
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl SystemConfig {
    pub fn validate(&self) -> Result<()> {
        self.engine.validate().map_err(anyhow::Error::msg)?;
        if let Some(dir) = &self.storage.data_dir {
            if dir.as_os_str().is_empty() {
                anyhow::bail!("storage.data_dir must not be empty");
            }
        }
        Ok(())
    }

    /// Data directory from the file, or the platform default
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("snapline"))
            .context("Could not determine data directory")
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("snapline").join("config.toml"))
}

pub fn load() -> Result<SystemConfig> {
    let path = config_file_path().context("Could not determine config file path")?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(SystemConfig::default());
    }

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: SystemConfig =
        toml::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    Ok(config)
}

pub fn save(config: &SystemConfig) -> Result<()> {
    let path = config_file_path().context("Could not determine config file path")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let text = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    std::fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write the default configuration if no file exists yet
pub fn init_if_missing() -> Result<bool> {
    let path = config_file_path().context("Could not determine config file path")?;
    if path.exists() {
        return Ok(false);
    }
    save(&SystemConfig::default())?;
    Ok(true)
}

pub fn example_config() -> &'static str {
    r#"# snapline configuration

[engine]
# Checkpoints kept across all files and branches (1-100000)
max_checkpoints = 50
# Create checkpoints automatically on edits and saves
auto_save = true
# Key under which the state is stored in every backend
storage_key = "checkpoints"
# "mirror" writes every backend, "first-success" stops at the first that works
save_mode = "mirror"

[storage]
# Defaults to the platform data directory
# data_dir = "/home/me/.local/share/snapline"
"#
}
