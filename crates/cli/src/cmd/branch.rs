//! List, create and switch branches

use crate::util::Session;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub async fn run_list(data_dir: Option<PathBuf>) -> Result<()> {
    let session = Session::load(data_dir)?;
    let store = session.open_store().await?;

    for name in store.list_branches() {
        let count = store.list_checkpoints(&name).map_or(0, <[_]>::len);
        let counts = format!("({} checkpoints)", count);
        if name == store.current_branch() {
            println!("{} {} {}", "*".green(), name.green().bold(), counts.dimmed());
        } else {
            println!("  {} {}", name, counts.dimmed());
        }
    }
    Ok(())
}

pub async fn run_create(data_dir: Option<PathBuf>, name: &str, from: Option<&str>) -> Result<()> {
    let session = Session::load(data_dir)?;
    let mut store = session.open_store().await?;

    let source = from.unwrap_or(store.current_branch()).to_string();
    if !store.create_branch(name, Some(&source)) {
        if store.list_checkpoints(&source).is_none() {
            anyhow::bail!("Source branch not found: '{}'", source);
        }
        anyhow::bail!("Cannot create branch '{}': name is empty or already taken", name);
    }
    store.flush().await;

    println!(
        "{} Created branch {} from {}",
        "✓".green(),
        name.trim().cyan(),
        source.cyan()
    );
    Ok(())
}

pub async fn run_switch(data_dir: Option<PathBuf>, name: &str) -> Result<()> {
    let session = Session::load(data_dir)?;
    let mut store = session.open_store().await?;

    if !store.switch_branch(name) {
        anyhow::bail!("Branch not found: '{}'", name);
    }
    store.flush().await;

    println!("{} Switched to branch {}", "✓".green(), name.cyan());
    Ok(())
}
