//! Show store statistics

use crate::util::{self, Session};
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

const MAX_FILES_SHOWN: usize = 20;

pub async fn run(data_dir: Option<PathBuf>) -> Result<()> {
    let session = Session::load(data_dir)?;
    let store = session.open_store().await?;
    let stats = store.stats();

    println!("{}", "Store Status".bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    println!("Data directory: {}", session.data_dir.display().to_string().cyan());
    println!(
        "Checkpoints:    {} / {}",
        stats.total,
        stats.max_checkpoints
    );
    println!("Content size:   {}", util::format_size(stats.bytes as u64));
    println!("Branches:       {}", stats.branches);
    println!("Active branch:  {}", stats.current_branch.green());
    println!(
        "Auto-save:      {}",
        if stats.auto_save { "on".green().to_string() } else { "off".yellow().to_string() }
    );
    println!();

    println!("Latest checkpoint:");
    match store.checkpoints().next() {
        Some(cp) => {
            println!("  ID:          {}", cp.short_id().yellow());
            println!(
                "  Time:        {} ({})",
                util::format_relative_time(cp.timestamp),
                util::format_absolute_time(cp.timestamp).dimmed()
            );
            println!("  File:        {}", cp.file_path);
        }
        None => println!("  {}", "None yet".dimmed()),
    }

    if !stats.files.is_empty() {
        println!();
        println!("{} ({})", "Files:".bold(), stats.files.len());
        for (path, count) in stats.files.iter().take(MAX_FILES_SHOWN) {
            println!("  {:>4}  {}", count, path.cyan());
        }
        if stats.files.len() > MAX_FILES_SHOWN {
            println!(
                "  {} ({} more files omitted)",
                "...".dimmed(),
                stats.files.len() - MAX_FILES_SHOWN
            );
        }
    }

    Ok(())
}
