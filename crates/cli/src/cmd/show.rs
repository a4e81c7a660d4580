//! Show checkpoint details

use crate::util::{self, Session};
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub async fn run(data_dir: Option<PathBuf>, checkpoint_ref: &str, show_content: bool) -> Result<()> {
    let session = Session::load(data_dir)?;
    let store = session.open_store().await?;
    let checkpoint = util::resolve_checkpoint_ref(checkpoint_ref, &store)?;

    println!("{} {}", "checkpoint".yellow().bold(), checkpoint.id.cyan());
    println!("{} {}", "File:       ".dimmed(), checkpoint.file_path);
    println!("{} {}", "Branch:     ".dimmed(), checkpoint.branch);

    let relative_time = util::format_relative_time(checkpoint.timestamp);
    let absolute_time = util::format_absolute_time(checkpoint.timestamp);
    println!("{} {} ({})", "Date:       ".dimmed(), absolute_time, relative_time.dimmed());

    println!("{} {}", "Type:       ".dimmed(), checkpoint.change_type.cyan());
    println!("{} {}", "Description:".dimmed(), checkpoint.description);
    println!("{} {}", "Language:   ".dimmed(), checkpoint.language);
    println!(
        "{} {}",
        "Manual:     ".dimmed(),
        if checkpoint.manual { "yes" } else { "no" }
    );

    println!("\n{}", "Metadata:".bold());
    println!("  Lines:  {}", checkpoint.metadata.lines);
    println!("  Size:   {}", util::format_size(checkpoint.metadata.size as u64));
    println!("  Hash:   {}", checkpoint.metadata.hash.to_hex().bright_green());

    // Other branches holding the same checkpoint
    let holders: Vec<String> = store
        .list_branches()
        .into_iter()
        .filter(|name| {
            store
                .list_checkpoints(name)
                .is_some_and(|list| list.iter().any(|cp| cp.id == checkpoint.id))
        })
        .collect();
    if !holders.is_empty() {
        println!("  On:     {}", holders.join(", ").cyan());
    }

    if show_content {
        println!("\n{}", "Content:".bold());
        println!("{}", checkpoint.content);
    }

    Ok(())
}
