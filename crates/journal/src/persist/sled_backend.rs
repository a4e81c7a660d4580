//! Primary backend on the sled embedded database

use super::StorageBackend;
use crate::Result;
use async_trait::async_trait;
use sled::Db;
use std::path::Path;

/// Stores each payload as one value in a sled database
///
/// Calls run on the blocking pool since sled I/O is synchronous.
#[derive(Clone)]
pub struct SledBackend {
    db: Db,
}

impl SledBackend {
    /// Open or create the database under `dir`
    pub fn open(dir: &Path) -> Result<Self> {
        let db = sled::open(dir.join("checkpoints.db"))?;
        Ok(Self { db })
    }
}

#[async_trait]
impl StorageBackend for SledBackend {
    fn name(&self) -> &str {
        "sled"
    }

    async fn save(&self, key: &str, payload: &[u8]) -> Result<()> {
        let db = self.db.clone();
        let key = key.to_string();
        let payload = payload.to_vec();
        tokio::task::spawn_blocking(move || -> Result<()> {
            db.insert(key.as_bytes(), payload)?;
            // Flush to ensure durability
            db.flush()?;
            Ok(())
        })
        .await?
    }

    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let db = self.db.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<Vec<u8>>> {
            Ok(db.get(key.as_bytes())?.map(|v| v.to_vec()))
        })
        .await?
    }
}
