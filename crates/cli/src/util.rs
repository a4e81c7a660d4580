//! Shared utilities for CLI commands

use crate::system_config::{self, SystemConfig};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use path_absolutize::Absolutize;
use snapline_journal::{
    Checkpoint, CheckpointStore, FileBackend, PersistenceGateway, SledBackend, StorageBackend,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Configuration plus the data directory resolved against `--data-dir`
pub struct Session {
    pub config: SystemConfig,
    pub data_dir: PathBuf,
}

impl Session {
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self> {
        let config = system_config::load()?;
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => config.data_dir()?,
        };
        Ok(Self { config, data_dir })
    }

    /// Open the store with the database as primary and a JSON file as backup
    ///
    /// A database that cannot be opened (locked, damaged) is skipped; the
    /// backup alone still serves reads and writes.
    pub async fn open_store(&self) -> Result<CheckpointStore> {
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Failed to create {}", self.data_dir.display()))?;

        let mut backends: Vec<Arc<dyn StorageBackend>> = Vec::with_capacity(2);
        match SledBackend::open(&self.data_dir.join("db")) {
            Ok(backend) => backends.push(Arc::new(backend)),
            Err(e) => tracing::warn!(error = %e, "Database unavailable, using file backup only"),
        }
        backends.push(Arc::new(FileBackend::new(self.data_dir.join("backup"))));

        let engine = self.config.engine.clone();
        let gateway = Arc::new(PersistenceGateway::new(
            backends,
            engine.storage_key.clone(),
            engine.save_mode,
        ));
        let store = CheckpointStore::open(engine, gateway).await;
        // Open may have queued a save after applying a lowered cap
        store.flush().await;
        Ok(store)
    }
}

/// Resolve checkpoint reference to an id
/// Supports:
/// - Full id exactly as stored: "01HN8XYZ..."
/// - Prefix of at least 4 characters, case-insensitive (must be unique)
/// - "latest": newest checkpoint on the active branch
pub fn resolve_checkpoint_ref<'a>(reference: &str, store: &'a CheckpointStore) -> Result<&'a Arc<Checkpoint>> {
    if reference == "latest" {
        let id = store
            .current_branch_checkpoints()
            .first()
            .map(|cp| cp.id.clone())
            .with_context(|| format!("Branch '{}' has no checkpoints", store.current_branch()))?;
        return store.get(&id).context("Checkpoint vanished while resolving");
    }

    if let Some(cp) = store.get(reference) {
        return Ok(cp);
    }

    if reference.len() >= 4 {
        let matching: Vec<_> = store
            .checkpoints()
            .filter(|cp| {
                cp.id
                    .get(..reference.len())
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(reference))
            })
            .collect();

        if matching.len() == 1 {
            return Ok(matching[0]);
        } else if matching.len() > 1 {
            anyhow::bail!(
                "Ambiguous checkpoint prefix '{}': matches {} checkpoints",
                reference,
                matching.len()
            );
        }
    }

    anyhow::bail!("Unknown checkpoint reference: '{}'", reference)
}

/// Path as stored in checkpoints: absolute, with `.` and `..` folded away
///
/// The file does not have to exist, so `log --file` and `clear --file` can
/// name paths that were deleted since they were saved.
pub fn path_key(path: &Path) -> Result<String> {
    let absolute = path
        .absolutize()
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    Ok(absolute.to_string_lossy().into_owned())
}

/// Format timestamp as relative time ("2 hours ago")
pub fn format_relative_time(ts_ms: u64) -> String {
    let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
    if ts_ms > now {
        return "in the future".to_string();
    }

    let seconds = (now - ts_ms) / 1000;
    if seconds < 60 {
        format!("{} seconds ago", seconds)
    } else if seconds < 3600 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours ago", seconds / 3600)
    } else if seconds < 604800 {
        format!("{} days ago", seconds / 86400)
    } else {
        format!("{} weeks ago", seconds / 604800)
    }
}

/// Format timestamp as local time ("2024-01-03 14:30:00")
pub fn format_absolute_time(ts_ms: u64) -> String {
    i64::try_from(ts_ms)
        .ok()
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|dt| dt.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts_ms.to_string())
}

/// Format file size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Display a checkpoint in compact format
pub fn display_checkpoint_compact(cp: &Checkpoint, show_file: bool) {
    let time_str = format_relative_time(cp.timestamp);
    let marker = if cp.manual { "*" } else { " " };

    if show_file {
        println!(
            "{}{} {} {} {} {}",
            cp.short_id().yellow(),
            marker.bold(),
            time_str.dimmed(),
            cp.change_type.as_str().cyan(),
            cp.file_path,
            cp.description.dimmed()
        );
    } else {
        println!(
            "{}{} {} {} {}",
            cp.short_id().yellow(),
            marker.bold(),
            time_str.dimmed(),
            cp.change_type.as_str().cyan(),
            cp.description.dimmed()
        );
    }
}
