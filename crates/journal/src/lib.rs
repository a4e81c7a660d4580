//! Checkpoint journal and branch management
//!
//! This crate provides:
//! - Checkpoint data structures (ULID-based IDs)
//! - Branch registry with copy-on-create branches
//! - Global FIFO retention cap
//! - The checkpoint store: create, lookup, delete, clear, restore, compare
//! - Persistence gateway over sled and file backends, with fallback

pub mod branch;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod persist;
pub mod restore;
pub mod retention;
pub mod state;
pub mod store;

// Re-exports
pub use branch::{BranchRegistry, MAIN_BRANCH};
pub use checkpoint::{ChangeType, Checkpoint, CheckpointClock, CheckpointMeta, NewCheckpoint};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use persist::{FileBackend, MemoryBackend, PersistenceGateway, SaveMode, SledBackend, StorageBackend};
pub use restore::{ContentSource, Restored};
pub use retention::RetentionPolicy;
pub use state::{ExportBundle, ImportReport, PersistedState};
pub use store::{CheckpointStore, StoreStats};
pub use snapline_core::DiffResult;
