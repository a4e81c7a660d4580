//! Error type for journal storage

use thiserror::Error;

/// Errors raised by storage backends and state encoding
///
/// Engine operations never return these: persistence is best effort and
/// failures are logged where they happen.
#[derive(Debug, Error)]
pub enum Error {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("backend `{0}` is unavailable")]
    Unavailable(String),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for journal storage operations
pub type Result<T> = std::result::Result<T, Error>;
