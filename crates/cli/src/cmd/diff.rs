//! Show diff between checkpoints

use crate::util::{self, Session};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use snapline_core::unified;
use snapline_journal::ContentSource;
use std::path::PathBuf;

pub async fn run(
    data_dir: Option<PathBuf>,
    checkpoint_a: &str,
    checkpoint_b: Option<&str>,
    patch: bool,
    context: usize,
) -> Result<()> {
    let session = Session::load(data_dir)?;
    let store = session.open_store().await?;

    let cp_a = util::resolve_checkpoint_ref(checkpoint_a, &store)?;
    let cp_b = checkpoint_b
        .map(|reference| util::resolve_checkpoint_ref(reference, &store))
        .transpose()?;

    // Without a second checkpoint, compare against the file as it is now
    let live = match cp_b {
        Some(_) => None,
        None => Some(std::fs::read_to_string(&cp_a.file_path).with_context(|| {
            format!("No second checkpoint and could not read '{}'", cp_a.file_path)
        })?),
    };

    let result = store
        .compare(
            &cp_a.id,
            cp_b.map(|cp| cp.id.as_str()),
            live.as_ref().map(|text| text as &dyn ContentSource),
        )
        .context("Nothing to compare against")?;

    println!("{}", "Diff Summary".bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!(
        "From: {} {} {}",
        cp_a.short_id().yellow(),
        cp_a.file_path,
        util::format_relative_time(cp_a.timestamp).dimmed()
    );
    match cp_b {
        Some(cp_b) => println!(
            "To:   {} {} {}",
            cp_b.short_id().yellow(),
            cp_b.file_path,
            util::format_relative_time(cp_b.timestamp).dimmed()
        ),
        None => println!("To:   {} {}", "working copy".yellow(), cp_a.file_path),
    }
    println!();

    if result.is_empty() {
        println!("{}", "No changes".dimmed());
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Total: {} added, {} removed, {} changed",
            result.additions.to_string().green(),
            result.deletions.to_string().red(),
            result.changes.to_string().yellow()
        )
        .dimmed()
    );

    if patch {
        let new_content = match (cp_b, &live) {
            (Some(cp_b), _) => cp_b.content.as_str(),
            (None, Some(text)) => text.as_str(),
            (None, None) => "",
        };
        println!();
        print!("{}", unified(&cp_a.content, new_content, &cp_a.file_path, context));
    }

    Ok(())
}
