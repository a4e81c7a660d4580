//! Snapline Core - content primitives for the snapline checkpoint engine
//!
//! This crate provides:
//! - Content fingerprints for checkpoint metadata
//! - Positional line diff counts and unified diff rendering

pub mod diff;
pub mod hash;

// Re-export main types for convenience
pub use diff::{diff, unified, DiffResult};
pub use hash::{fingerprint, Fingerprint, IncrementalHasher, ParseFingerprintError};
