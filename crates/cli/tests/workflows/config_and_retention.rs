//! Configuration file handling and the checkpoint cap

use crate::common::TestEnv;
use crate::snap;
use anyhow::{Context, Result};

#[test]
fn test_config_set_get_roundtrip() -> Result<()> {
    let env = TestEnv::new()?;

    let default = snap!(env.root(), "config", "get", "engine.max_checkpoints").assert_success()?;
    assert_eq!(default.stdout.trim(), "50");

    snap!(env.root(), "config", "set", "engine.max_checkpoints", "7").assert_success()?;
    let value = snap!(env.root(), "config", "get", "engine.max_checkpoints").assert_success()?;
    assert_eq!(value.stdout.trim(), "7");
    assert!(env.path("config.toml").exists());

    let list = snap!(env.root(), "config", "list").assert_success()?;
    assert!(list.contains_stdout("[engine]"));
    assert!(list.contains_stdout("save_mode"));
    Ok(())
}

#[test]
fn test_config_rejects_bad_values() -> Result<()> {
    let env = TestEnv::new()?;
    snap!(env.root(), "config", "set", "engine.max_checkpoints", "0").assert_failure()?;
    snap!(env.root(), "config", "set", "engine.save_mode", "sometimes").assert_failure()?;
    let unknown = snap!(env.root(), "config", "get", "engine.nope").assert_failure()?;
    assert!(unknown.contains_stderr("Unknown config key"));
    assert!(!env.path("config.toml").exists());
    Ok(())
}

#[test]
fn test_config_path_create_and_example() -> Result<()> {
    let env = TestEnv::new()?;
    let created = snap!(env.root(), "config", "path", "--create").assert_success()?;
    assert!(created.contains_stdout("Created config file"));
    assert!(env.path("config.toml").exists());

    let example = snap!(env.root(), "config", "example").assert_success()?;
    assert!(example.contains_stdout("max_checkpoints = 50"));
    Ok(())
}

#[test]
fn test_cap_evicts_oldest() -> Result<()> {
    let env = TestEnv::new()?;
    snap!(env.root(), "config", "set", "engine.max_checkpoints", "3").assert_success()?;

    let file = env.write_file("a.txt", "0")?;
    let first = snap!(env.root(), "save", file.as_str())
        .assert_success()?
        .parse_checkpoint_id()
        .context("no id")?;
    for i in 1..4 {
        env.write_file("a.txt", &i.to_string())?;
        snap!(env.root(), "save", file.as_str()).assert_success()?;
    }

    let log = snap!(env.root(), "log").assert_success()?;
    assert!(log.contains_stdout("3 total"));
    snap!(env.root(), "show", first.as_str()).assert_failure()?;
    Ok(())
}

#[test]
fn test_auto_save_off_skips_automatic_saves() -> Result<()> {
    let env = TestEnv::new()?;
    snap!(env.root(), "config", "set", "engine.auto_save", "false").assert_success()?;
    let file = env.write_file("a.txt", "a")?;

    let skipped = snap!(env.root(), "save", file.as_str(), "--auto").assert_success()?;
    assert!(skipped.contains_stdout("Auto-save is off"));
    assert!(skipped.parse_checkpoint_id().is_none());

    // Explicit saves still go through
    snap!(env.root(), "save", file.as_str()).assert_success()?;
    let stats = snap!(env.root(), "stats").assert_success()?;
    assert!(stats.contains_stdout("1 / 50"));
    Ok(())
}

#[test]
fn test_lowered_cap_persists_after_read_only_command() -> Result<()> {
    let env = TestEnv::new()?;
    let file = env.write_file("a.txt", "0")?;
    for i in 0..4 {
        env.write_file("a.txt", &i.to_string())?;
        snap!(env.root(), "save", file.as_str()).assert_success()?;
    }
    snap!(env.root(), "config", "set", "engine.max_checkpoints", "2").assert_success()?;

    // Opening for a read trims the store, and the trim reaches the backup file
    let log = snap!(env.root(), "log").assert_success()?;
    assert!(log.contains_stdout("2 total"));

    let backup = env.read_file("data/backup/checkpoints.json")?;
    let state: serde_json::Value = serde_json::from_str(&backup)?;
    let checkpoints = state["checkpoints"].as_array().context("checkpoints array")?;
    assert_eq!(checkpoints.len(), 2);
    Ok(())
}
