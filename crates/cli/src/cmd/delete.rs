//! Delete a checkpoint

use crate::util::{self, Session};
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub async fn run(data_dir: Option<PathBuf>, checkpoint_ref: &str) -> Result<()> {
    let session = Session::load(data_dir)?;
    let mut store = session.open_store().await?;

    let id = util::resolve_checkpoint_ref(checkpoint_ref, &store)?.id.clone();
    if !store.delete(&id) {
        anyhow::bail!("Checkpoint not found: {}", id);
    }
    store.flush().await;

    println!("{} Deleted checkpoint {}", "✓".green(), id.yellow());
    Ok(())
}
