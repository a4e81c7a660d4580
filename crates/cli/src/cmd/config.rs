//! Configuration management command
//!
//! Provides CLI interface to view and edit the configuration file.

use crate::system_config::{self, SystemConfig};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use snapline_journal::SaveMode;
use std::path::PathBuf;

const KEYS: &[&str] = &[
    "engine.max_checkpoints",
    "engine.auto_save",
    "engine.storage_key",
    "engine.save_mode",
    "storage.data_dir",
];

fn save_mode_name(mode: SaveMode) -> &'static str {
    match mode {
        SaveMode::Mirror => "mirror",
        SaveMode::FirstSuccess => "first-success",
    }
}

fn value_of(config: &SystemConfig, key: &str) -> Result<String> {
    let value = match key {
        "engine.max_checkpoints" => config.engine.max_checkpoints.to_string(),
        "engine.auto_save" => config.engine.auto_save.to_string(),
        "engine.storage_key" => config.engine.storage_key.clone(),
        "engine.save_mode" => save_mode_name(config.engine.save_mode).to_string(),
        "storage.data_dir" => config.data_dir()?.display().to_string(),
        _ => anyhow::bail!(
            "Unknown config key: {}. Use 'snap config list' to see available keys.",
            key
        ),
    };
    Ok(value)
}

/// List all configuration values
pub async fn run_list() -> Result<()> {
    let config = system_config::load()?;
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    println!("{}", "Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), config_path.display().dimmed());

    let mut section = "";
    for key in KEYS {
        let (prefix, name) = key.split_once('.').unwrap_or(("", key));
        if prefix != section {
            if !section.is_empty() {
                println!();
            }
            println!("{}", format!("[{}]", prefix).yellow());
            section = prefix;
        }
        println!("  {} = {}", name.cyan(), value_of(&config, key)?);
    }

    println!("\n{}", "Valid Ranges:".bold());
    println!("  max_checkpoints: 1-100,000");
    println!("  save_mode: mirror | first-success");

    Ok(())
}

/// Get a single configuration value
pub async fn run_get(key: &str) -> Result<()> {
    let config = system_config::load()?;
    println!("{}", value_of(&config, key)?);
    Ok(())
}

/// Set a configuration value
pub async fn run_set(key: &str, value: &str) -> Result<()> {
    let mut config = system_config::load()?;

    match key {
        "engine.max_checkpoints" => {
            let val: usize = value.parse()
                .context("Invalid value: must be a positive integer")?;
            config.engine.max_checkpoints = val;
        }
        "engine.auto_save" => {
            let val: bool = value.parse()
                .context("Invalid value: must be 'true' or 'false'")?;
            config.engine.auto_save = val;
        }
        "engine.storage_key" => {
            config.engine.storage_key = value.to_string();
        }
        "engine.save_mode" => {
            config.engine.save_mode = match value {
                "mirror" => SaveMode::Mirror,
                "first-success" => SaveMode::FirstSuccess,
                _ => anyhow::bail!("Invalid value: must be 'mirror' or 'first-success'"),
            };
        }
        "storage.data_dir" => {
            config.storage.data_dir = Some(PathBuf::from(value));
        }
        _ => anyhow::bail!(
            "Unknown config key: {}. Use 'snap config list' to see available keys.",
            key
        ),
    }

    // Validate before saving
    config.validate()
        .context("Invalid configuration value")?;

    system_config::save(&config)?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    Ok(())
}

/// Show the config file path and optionally create it
pub async fn run_path(create: bool) -> Result<()> {
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    if create && system_config::init_if_missing()? {
        println!("{} Created config file at: {}", "✓".green(), config_path.display());
    } else if config_path.exists() {
        println!("{}", config_path.display());
    } else {
        println!("{}", config_path.display());
        println!("{}", "File does not exist. Use --create to create it.".yellow());
    }

    Ok(())
}

/// Show example configuration
pub async fn run_example() -> Result<()> {
    print!("{}", system_config::example_config());
    Ok(())
}
