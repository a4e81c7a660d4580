//! Show checkpoint timeline

use crate::util::{self, Session};
use anyhow::Result;
use owo_colors::OwoColorize;
use snapline_journal::Checkpoint;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_LIMIT: usize = 20;

pub async fn run(
    data_dir: Option<PathBuf>,
    file: Option<&Path>,
    branch: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let session = Session::load(data_dir)?;
    let store = session.open_store().await?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT);

    // Newest first in every view
    let mut checkpoints: Vec<Arc<Checkpoint>> = match branch {
        Some(name) => match store.list_checkpoints(name) {
            Some(list) => list.iter().rev().cloned().collect(),
            None => anyhow::bail!("Branch not found: '{}'", name),
        },
        None => store.checkpoints().cloned().collect(),
    };

    if let Some(file) = file {
        let key = util::path_key(file)?;
        checkpoints.retain(|cp| cp.file_path == key);
    }

    let title = match branch {
        Some(name) => format!("Checkpoints on {}", name),
        None => "Checkpoints".to_string(),
    };
    println!("{} {}", title.bold(), format!("({} total)", checkpoints.len()).dimmed());

    if checkpoints.is_empty() {
        println!("  {}", "No checkpoints".dimmed());
        return Ok(());
    }

    for cp in checkpoints.iter().take(limit) {
        util::display_checkpoint_compact(cp, file.is_none());
    }
    if checkpoints.len() > limit {
        println!(
            "{}",
            format!("... {} more (use --limit)", checkpoints.len() - limit).dimmed()
        );
    }

    Ok(())
}
