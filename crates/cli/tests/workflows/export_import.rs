//! Moving checkpoints between stores with export and import

use crate::common::TestEnv;
use crate::snap;
use anyhow::{Context, Result};

#[test]
fn test_export_format() -> Result<()> {
    let env = TestEnv::new()?;
    let file = env.write_file("a.txt", "hello")?;
    snap!(env.root(), "save", file.as_str(), "--type", "ai-edit").assert_success()?;

    let exported = snap!(env.root(), "export").assert_success()?;
    let json: serde_json::Value = serde_json::from_str(&exported.stdout)?;
    assert_eq!(json["version"], 1);
    assert_eq!(json["currentBranch"], "main");
    assert!(json["exportedAt"].as_u64().is_some());

    let cp = &json["checkpoints"][0];
    assert_eq!(cp["content"], "hello");
    assert_eq!(cp["changeType"], "ai-edit");
    assert_eq!(cp["description"], "AI edit");
    assert_eq!(cp["metadata"]["lines"], 1);
    assert_eq!(json["branches"]["main"][0]["id"], cp["id"]);
    Ok(())
}

#[test]
fn test_import_into_another_store() -> Result<()> {
    let source = TestEnv::new()?;
    let file = source.write_file("a.txt", "one")?;
    let id = snap!(source.root(), "save", file.as_str())
        .assert_success()?
        .parse_checkpoint_id()
        .context("no id")?;
    snap!(source.root(), "branch", "create", "feature").assert_success()?;

    let bundle = source.path("bundle.json");
    let bundle = bundle.to_str().context("path")?;
    snap!(source.root(), "export", "-o", bundle).assert_success()?;

    let target = TestEnv::new()?;
    let imported = snap!(target.root(), "import", bundle).assert_success()?;
    assert!(imported.contains_stdout("1 checkpoints"));
    assert!(imported.contains_stdout("1 branches"));

    let shown = snap!(target.root(), "show", id.as_str(), "--content").assert_success()?;
    assert!(shown.contains_stdout("one"));
    let list = snap!(target.root(), "branch", "list").assert_success()?;
    assert!(list.contains_stdout("feature"));

    // Importing again adds nothing
    let again = snap!(target.root(), "import", bundle).assert_success()?;
    assert!(again.contains_stdout("0 checkpoints"));
    assert!(again.contains_stdout("0 branches"));
    Ok(())
}

#[test]
fn test_import_rejects_garbage_and_newer_versions() -> Result<()> {
    let env = TestEnv::new()?;
    let garbage = env.write_file("garbage.json", "{ not json")?;
    snap!(env.root(), "import", garbage.as_str()).assert_failure()?;

    let newer = env.write_file(
        "newer.json",
        r#"{"checkpoints":[],"branches":{},"currentBranch":"main","exportedAt":0,"version":99}"#,
    )?;
    let failed = snap!(env.root(), "import", newer.as_str()).assert_failure()?;
    assert!(failed.contains_stderr("newer"));
    Ok(())
}
