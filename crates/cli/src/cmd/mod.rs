//! CLI command implementations

pub mod branch;
pub mod clear;
pub mod config;
pub mod delete;
pub mod diff;
pub mod log;
pub mod restore;
pub mod save;
pub mod show;
pub mod stats;
pub mod transfer;
