//! Persistence gateway with an ordered backend fallback chain
//!
//! The engine state is kept in memory and written out in the background.
//! Backends are tried in priority order:
//! 1. [`SledBackend`] - embedded document store (primary)
//! 2. [`FileBackend`] - one JSON file per key (fallback and backup)
//!
//! [`MemoryBackend`] serves tests and sessions that should not touch disk.

mod file;
mod memory;
mod saver;
mod sled_backend;

pub use file::{atomic_write, FileBackend};
pub use memory::MemoryBackend;
pub use sled_backend::SledBackend;

pub(crate) use saver::Saver;

use crate::state::PersistedState;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Key-value storage contract required by the engine
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Store `payload` under `key`, replacing any previous value
    async fn save(&self, key: &str, payload: &[u8]) -> Result<()>;

    /// Fetch the payload under `key`, `None` if nothing is stored
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

/// How a save is spread across backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaveMode {
    /// Write every backend; lower priority ones act as redundant backups
    #[default]
    Mirror,
    /// Stop at the first backend that accepts the write
    FirstSuccess,
}

/// Ordered list of backends behind a save/load interface
pub struct PersistenceGateway {
    backends: Vec<Arc<dyn StorageBackend>>,
    key: String,
    mode: SaveMode,
}

impl PersistenceGateway {
    /// Gateway over `backends`, highest priority first
    pub fn new(backends: Vec<Arc<dyn StorageBackend>>, key: impl Into<String>, mode: SaveMode) -> Self {
        Self {
            backends,
            key: key.into(),
            mode,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Write the state. Returns whether at least one backend accepted it.
    pub async fn save(&self, state: &PersistedState) -> bool {
        let payload = match serde_json::to_vec(state) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to encode checkpoint state: {}", e);
                return false;
            }
        };

        let mut saved = false;
        for backend in &self.backends {
            match backend.save(&self.key, &payload).await {
                Ok(()) => {
                    tracing::debug!(
                        backend = backend.name(),
                        bytes = payload.len(),
                        "Saved checkpoint state"
                    );
                    saved = true;
                    if self.mode == SaveMode::FirstSuccess {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(backend = backend.name(), "Failed to save checkpoint state: {}", e);
                }
            }
        }

        if !saved {
            tracing::warn!("No storage backend accepted the checkpoint state; keeping it in memory only");
        }
        saved
    }

    /// Read the state from the first backend that has a decodable payload
    pub async fn load(&self) -> Option<PersistedState> {
        for backend in &self.backends {
            let payload = match backend.load(&self.key).await {
                Ok(Some(payload)) => payload,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(backend = backend.name(), "Failed to load checkpoint state: {}", e);
                    continue;
                }
            };

            match serde_json::from_slice::<PersistedState>(&payload) {
                Ok(state) => {
                    tracing::debug!(
                        backend = backend.name(),
                        checkpoints = state.checkpoints.len(),
                        "Loaded checkpoint state"
                    );
                    return Some(state);
                }
                Err(e) => {
                    tracing::warn!(backend = backend.name(), "Ignoring corrupt checkpoint state: {}", e);
                }
            }
        }
        None
    }
}
