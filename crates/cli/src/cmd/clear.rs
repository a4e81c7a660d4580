//! Remove checkpoints of a file, or reset the store

use crate::util::{self, Session};
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

pub async fn run(data_dir: Option<PathBuf>, file: Option<&Path>, all: bool) -> Result<()> {
    if file.is_none() && !all {
        anyhow::bail!("Pass --file <path> to clear one file, or --all to remove everything");
    }

    let session = Session::load(data_dir)?;
    let mut store = session.open_store().await?;
    let before = store.len();

    match file {
        Some(file) => {
            let key = util::path_key(file)?;
            store.clear(Some(&key));
            println!(
                "{} Removed {} checkpoints of {}",
                "✓".green(),
                before - store.len(),
                key.cyan()
            );
        }
        None => {
            store.clear(None);
            println!(
                "{} Removed {} checkpoints; only {} is left",
                "✓".green(),
                before,
                store.current_branch().cyan()
            );
        }
    }

    store.flush().await;
    Ok(())
}
