//! Record a checkpoint of a file

use crate::util::{self, Session};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use snapline_journal::{ChangeType, NewCheckpoint};
use std::path::{Path, PathBuf};

pub async fn run(
    data_dir: Option<PathBuf>,
    file: &Path,
    language: Option<String>,
    change_type: Option<&str>,
    message: Option<String>,
    auto: bool,
) -> Result<()> {
    let change_type = match change_type {
        Some(name) => name.parse::<ChangeType>().map_err(anyhow::Error::msg)?,
        None if auto => ChangeType::Auto,
        None => ChangeType::Manual,
    };

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut request = NewCheckpoint::new(util::path_key(file)?, content)
        .change_type(change_type)
        .manual(!auto);
    if let Some(language) = language {
        request = request.language(language);
    }
    if let Some(message) = message {
        request = request.description(message);
    }

    let session = Session::load(data_dir)?;
    let mut store = session.open_store().await?;

    let Some(cp) = store.create(request) else {
        if auto && !store.auto_save() {
            println!("{}", "Auto-save is off; no checkpoint recorded".yellow());
            return Ok(());
        }
        anyhow::bail!("Could not create a checkpoint for '{}'", file.display());
    };
    store.flush().await;

    println!(
        "{} Created checkpoint {} {}",
        "✓".green(),
        cp.id.yellow(),
        format!("({}, {} lines)", cp.description, cp.metadata.lines).dimmed()
    );
    Ok(())
}
