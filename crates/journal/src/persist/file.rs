//! Fallback backend: one JSON file per key

use super::StorageBackend;
use crate::Result;
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Stores each payload in `<dir>/<key>.json`
///
/// Writes go through a temporary file in the same directory followed by a
/// rename, so a crash never leaves a half written payload behind.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

/// Atomic write helper
///
/// Writes data to a temporary file, fsyncs it, then renames it over the target.
pub fn atomic_write(dir: &Path, target: &Path, data: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl StorageBackend for FileBackend {
    fn name(&self) -> &str {
        "file"
    }

    async fn save(&self, key: &str, payload: &[u8]) -> Result<()> {
        let dir = self.dir.clone();
        let target = self.path_for(key);
        let payload = payload.to_vec();
        tokio::task::spawn_blocking(move || atomic_write(&dir, &target, &payload)).await??;
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
