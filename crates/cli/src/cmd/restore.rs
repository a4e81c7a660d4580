//! Write a checkpoint's content back to disk

use crate::util::{self, Session};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use snapline_journal::persist::atomic_write;
use std::io::Write;
use std::path::{Path, PathBuf};

pub async fn run(
    data_dir: Option<PathBuf>,
    checkpoint_ref: &str,
    output: Option<PathBuf>,
    to_stdout: bool,
) -> Result<()> {
    let session = Session::load(data_dir)?;
    let store = session.open_store().await?;

    let id = util::resolve_checkpoint_ref(checkpoint_ref, &store)?.id.clone();
    let restored = store
        .restore(&id)
        .with_context(|| format!("Checkpoint not found: {}", id))?;

    if to_stdout {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(restored.content.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    let target = output.unwrap_or_else(|| PathBuf::from(&restored.checkpoint.file_path));
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    atomic_write(&dir, &target, restored.content.as_bytes())
        .with_context(|| format!("Failed to write {}", target.display()))?;

    println!(
        "{} Restored {} to {}",
        "✓".green(),
        restored.checkpoint.short_id().yellow(),
        target.display()
    );
    Ok(())
}
