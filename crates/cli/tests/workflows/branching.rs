//! Branch create, switch and isolation across invocations

use crate::common::TestEnv;
use crate::snap;
use anyhow::{Context, Result};

#[test]
fn test_new_store_has_only_main() -> Result<()> {
    let env = TestEnv::new()?;
    let list = snap!(env.root(), "branch", "list").assert_success()?;
    assert!(list.contains_stdout("main"));
    assert!(list.contains_stdout("0 checkpoints"));
    Ok(())
}

#[test]
fn test_branch_copies_then_diverges() -> Result<()> {
    let env = TestEnv::new()?;
    let file = env.write_file("app.rs", "fn main() {}")?;
    snap!(env.root(), "save", file.as_str(), "-m", "on-main").assert_success()?;

    let created = snap!(env.root(), "branch", "create", "feature").assert_success()?;
    assert!(created.contains_stdout("Created branch"));

    // Creating does not switch
    let stats = snap!(env.root(), "stats").assert_success()?;
    assert!(stats.contains_stdout("Active branch:"));
    assert!(stats.contains_stdout("main"));

    snap!(env.root(), "branch", "switch", "feature").assert_success()?;
    env.write_file("app.rs", "fn main() { run() }")?;
    snap!(env.root(), "save", file.as_str(), "-m", "on-feature").assert_success()?;

    let feature = snap!(env.root(), "log", "--branch", "feature").assert_success()?;
    assert!(feature.contains_stdout("2 total"));
    assert!(feature.contains_stdout("on-feature"));
    assert!(feature.contains_stdout("on-main"));

    let main = snap!(env.root(), "log", "--branch", "main").assert_success()?;
    assert!(main.contains_stdout("1 total"));
    assert!(!main.contains_stdout("on-feature"));

    // The active branch survives a restart of the process
    let shown = snap!(env.root(), "show", "latest").assert_success()?;
    assert!(shown.contains_stdout("feature"));
    Ok(())
}

#[test]
fn test_branch_errors() -> Result<()> {
    let env = TestEnv::new()?;

    let taken = snap!(env.root(), "branch", "create", "main").assert_failure()?;
    assert!(taken.contains_stderr("already taken"));

    let missing = snap!(env.root(), "branch", "create", "x", "--from", "ghost").assert_failure()?;
    assert!(missing.contains_stderr("Source branch not found"));

    let switch = snap!(env.root(), "branch", "switch", "ghost").assert_failure()?;
    assert!(switch.contains_stderr("Branch not found"));

    let log = snap!(env.root(), "log", "--branch", "ghost").assert_failure()?;
    assert!(log.contains_stderr("Branch not found"));
    Ok(())
}

#[test]
fn test_delete_removes_from_every_branch() -> Result<()> {
    let env = TestEnv::new()?;
    let file = env.write_file("a.txt", "shared")?;
    let id = snap!(env.root(), "save", file.as_str())
        .assert_success()?
        .parse_checkpoint_id()
        .context("no id")?;
    snap!(env.root(), "branch", "create", "copy").assert_success()?;

    snap!(env.root(), "delete", id.as_str()).assert_success()?;

    let copy = snap!(env.root(), "log", "--branch", "copy").assert_success()?;
    assert!(copy.contains_stdout("0 total"));
    Ok(())
}

#[test]
fn test_clear_all_resets_branches() -> Result<()> {
    let env = TestEnv::new()?;
    let file = env.write_file("a.txt", "a")?;
    snap!(env.root(), "save", file.as_str()).assert_success()?;
    snap!(env.root(), "branch", "create", "feature").assert_success()?;
    snap!(env.root(), "branch", "switch", "feature").assert_success()?;

    snap!(env.root(), "clear", "--all").assert_success()?;

    let list = snap!(env.root(), "branch", "list").assert_success()?;
    assert!(list.contains_stdout("main"));
    assert!(!list.contains_stdout("feature"));
    Ok(())
}
