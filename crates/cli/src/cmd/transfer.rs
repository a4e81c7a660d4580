//! Export and import of the whole store as JSON

use crate::util::Session;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use snapline_journal::ExportBundle;
use std::io::Write;
use std::path::{Path, PathBuf};

pub async fn run_export(data_dir: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let session = Session::load(data_dir)?;
    let store = session.open_store().await?;

    let bundle = store.export();
    let json = serde_json::to_string_pretty(&bundle).context("Failed to serialize export")?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            // Status goes to stderr so stdout stays clean for piping
            eprintln!(
                "{} Exported {} checkpoints on {} branches to {}",
                "✓".green(),
                bundle.checkpoints.len(),
                bundle.branches.len(),
                path.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

pub async fn run_import(data_dir: Option<PathBuf>, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let bundle: ExportBundle = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a snapline export", file.display()))?;
    let version = bundle.version;

    let session = Session::load(data_dir)?;
    let mut store = session.open_store().await?;

    let report = store
        .import(bundle)
        .with_context(|| format!("Export format version {} is newer than this snap", version))?;
    store.flush().await;

    println!(
        "{} Imported {} checkpoints and {} branches",
        "✓".green(),
        report.checkpoints_added,
        report.branches_added
    );
    if report.evicted > 0 {
        println!(
            "{}",
            format!("{} oldest checkpoints evicted to stay within the cap", report.evicted).yellow()
        );
    }
    Ok(())
}
