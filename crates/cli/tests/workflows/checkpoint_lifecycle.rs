//! Save, inspect, diff, restore and delete

use crate::common::TestEnv;
use crate::snap;
use anyhow::{Context, Result};

#[test]
fn test_save_and_show() -> Result<()> {
    let env = TestEnv::new()?;
    let file = env.write_file("notes.txt", "first line\nsecond line")?;

    let result = snap!(env.root(), "save", file.as_str(), "--language", "markdown", "-m", "draft")
        .assert_success()?;
    assert!(result.contains_stdout("Created checkpoint"));
    let id = result.parse_checkpoint_id().context("no checkpoint id in output")?;

    let shown = snap!(env.root(), "show", id.as_str(), "--content").assert_success()?;
    assert!(shown.contains_stdout(&id));
    assert!(shown.contains_stdout("markdown"));
    assert!(shown.contains_stdout("draft"));
    assert!(shown.contains_stdout("second line"));
    Ok(())
}

#[test]
fn test_log_lists_newest_first() -> Result<()> {
    let env = TestEnv::new()?;
    let file = env.write_file("a.txt", "one")?;
    let first = snap!(env.root(), "save", file.as_str(), "-m", "first-save")
        .assert_success()?
        .parse_checkpoint_id()
        .context("no id")?;

    env.write_file("a.txt", "two")?;
    let second = snap!(env.root(), "save", file.as_str(), "-m", "second-save")
        .assert_success()?
        .parse_checkpoint_id()
        .context("no id")?;
    assert_ne!(first, second);

    let log = snap!(env.root(), "log").assert_success()?;
    assert!(log.contains_stdout("2 total"));
    let newer = log.stdout.find("second-save").context("second missing")?;
    let older = log.stdout.find("first-save").context("first missing")?;
    assert!(newer < older);

    let limited = snap!(env.root(), "log", "--limit", "1").assert_success()?;
    assert!(!limited.contains_stdout("first-save"));
    assert!(limited.contains_stdout("1 more"));
    Ok(())
}

#[test]
fn test_diff_between_checkpoints_and_live_file() -> Result<()> {
    let env = TestEnv::new()?;
    let file = env.write_file("f.txt", "line1\nline2")?;
    let a = snap!(env.root(), "save", file.as_str())
        .assert_success()?
        .parse_checkpoint_id()
        .context("no id")?;

    env.write_file("f.txt", "line1\nline2\nline3")?;
    let b = snap!(env.root(), "save", file.as_str())
        .assert_success()?
        .parse_checkpoint_id()
        .context("no id")?;

    let result = snap!(env.root(), "diff", a.as_str(), b.as_str(), "-p").assert_success()?;
    assert!(result.contains_stdout("added"));
    assert!(result.contains_stdout("+line3"));

    // Working copy matches the second checkpoint
    let live = snap!(env.root(), "diff", b.as_str()).assert_success()?;
    assert!(live.contains_stdout("No changes"));

    env.write_file("f.txt", "line1")?;
    let live = snap!(env.root(), "diff", b.as_str(), "-p").assert_success()?;
    assert!(live.contains_stdout("removed"));
    assert!(live.contains_stdout("-line3"));
    Ok(())
}

#[test]
fn test_restore_writes_file_back() -> Result<()> {
    let env = TestEnv::new()?;
    let file = env.write_file("doc.txt", "original")?;
    let id = snap!(env.root(), "save", file.as_str())
        .assert_success()?
        .parse_checkpoint_id()
        .context("no id")?;

    env.write_file("doc.txt", "overwritten")?;
    snap!(env.root(), "restore", id.as_str()).assert_success()?;
    assert_eq!(env.read_file("doc.txt")?, "original");

    let printed = snap!(env.root(), "restore", id.as_str(), "--stdout").assert_success()?;
    assert_eq!(printed.stdout, "original");

    let copy = env.path("copy.txt");
    snap!(env.root(), "restore", "latest", "-o", copy.to_str().context("path")?).assert_success()?;
    assert_eq!(env.read_file("copy.txt")?, "original");
    Ok(())
}

#[test]
fn test_prefix_reference() -> Result<()> {
    let env = TestEnv::new()?;
    let file = env.write_file("x.txt", "x")?;
    let id = snap!(env.root(), "save", file.as_str())
        .assert_success()?
        .parse_checkpoint_id()
        .context("no id")?;

    let lower = id[..12].to_ascii_lowercase();
    let shown = snap!(env.root(), "show", lower.as_str()).assert_success()?;
    assert!(shown.contains_stdout(&id));
    Ok(())
}

#[test]
fn test_delete_and_unknown_reference() -> Result<()> {
    let env = TestEnv::new()?;
    let file = env.write_file("x.txt", "x")?;
    let id = snap!(env.root(), "save", file.as_str())
        .assert_success()?
        .parse_checkpoint_id()
        .context("no id")?;

    snap!(env.root(), "delete", id.as_str()).assert_success()?;
    let failed = snap!(env.root(), "show", id.as_str()).assert_failure()?;
    assert!(failed.contains_stderr("Unknown checkpoint reference"));

    let log = snap!(env.root(), "log").assert_success()?;
    assert!(log.contains_stdout("No checkpoints"));
    Ok(())
}

#[test]
fn test_save_missing_file_fails() -> Result<()> {
    let env = TestEnv::new()?;
    let missing = env.path("nope.txt");
    let failed = snap!(env.root(), "save", missing.to_str().context("path")?).assert_failure()?;
    assert!(failed.contains_stderr("Failed to read"));
    Ok(())
}

#[test]
fn test_clear_one_file() -> Result<()> {
    let env = TestEnv::new()?;
    let a = env.write_file("a.txt", "a")?;
    let b = env.write_file("b.txt", "b")?;
    snap!(env.root(), "save", a.as_str()).assert_success()?;
    snap!(env.root(), "save", b.as_str()).assert_success()?;

    // Refuses without a scope
    snap!(env.root(), "clear").assert_failure()?;

    snap!(env.root(), "clear", "--file", a.as_str()).assert_success()?;
    let log = snap!(env.root(), "log").assert_success()?;
    assert!(log.contains_stdout("1 total"));
    assert!(log.contains_stdout("b.txt"));
    assert!(!log.contains_stdout("a.txt"));
    Ok(())
}

#[test]
fn test_relative_and_dotted_paths_share_a_key() -> Result<()> {
    let env = TestEnv::new()?;
    env.write_file("a.txt", "one")?;
    env.write_file("sub/keep.txt", "keep")?;

    // The harness runs inside the scratch root, so these all name the same file
    snap!(env.root(), "save", "a.txt").assert_success()?;
    snap!(env.root(), "save", "./a.txt").assert_success()?;
    snap!(env.root(), "save", "sub/../a.txt").assert_success()?;
    snap!(env.root(), "save", "sub/keep.txt").assert_success()?;

    let log = snap!(env.root(), "log", "--file", "a.txt").assert_success()?;
    assert!(log.contains_stdout("3 total"));

    snap!(env.root(), "clear", "--file", "./a.txt").assert_success()?;
    let remaining = snap!(env.root(), "log").assert_success()?;
    assert!(remaining.contains_stdout("1 total"));
    assert!(remaining.contains_stdout("keep.txt"));
    Ok(())
}
