//! CLI command execution helpers with automatic timing
//!
//! This module provides a wrapper around the `snap` binary that points it
//! at an isolated config file and data directory, measures execution time,
//! and provides convenient assertion methods.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// CLI command builder with timing
pub struct SnapCommand {
    binary_path: PathBuf,
    working_dir: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
}

impl SnapCommand {
    /// Create a command confined to `root`
    ///
    /// The config file is `root/config.toml` and data goes to `root/data`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let mut env = HashMap::new();
        env.insert(
            "SNAP_CONFIG".to_string(),
            root.join("config.toml").to_string_lossy().into_owned(),
        );

        Self {
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_snap")),
            working_dir: root.to_path_buf(),
            args: vec![
                "--data-dir".to_string(),
                root.join("data").to_string_lossy().into_owned(),
            ],
            env,
        }
    }

    /// Add command arguments
    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    #[allow(dead_code)]
    pub fn env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Execute command and return result with timing
    pub fn execute(&self) -> Result<CommandResult> {
        let start = Instant::now();

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .envs(&self.env)
            .stdin(Stdio::null())
            .output()
            .context("Failed to execute command")?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            duration: start.elapsed(),
        })
    }

    /// Execute and assert success
    pub fn assert_success(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if !result.success() {
            anyhow::bail!(
                "Command failed (exit code: {}):\nArgs: {:?}\nStdout: {}\nStderr: {}",
                result.exit_code,
                self.args,
                result.stdout,
                result.stderr
            );
        }

        Ok(result)
    }

    /// Execute and expect failure
    pub fn assert_failure(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if result.success() {
            anyhow::bail!(
                "Command should have failed but succeeded:\nArgs: {:?}\nStdout: {}",
                self.args,
                result.stdout
            );
        }

        Ok(result)
    }
}

/// Command execution result with timing
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    #[allow(dead_code)]
    pub duration: Duration,
}

impl CommandResult {
    /// Check if command succeeded
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Check if stdout contains text
    pub fn contains_stdout(&self, text: &str) -> bool {
        self.stdout.contains(text)
    }

    /// Check if stderr contains text
    pub fn contains_stderr(&self, text: &str) -> bool {
        self.stderr.contains(text)
    }

    /// Parse checkpoint ID from output (ULID format: 01XXXXXXXXXX...)
    pub fn parse_checkpoint_id(&self) -> Option<String> {
        self.stdout.lines().find_map(extract_ulid)
    }
}

/// Extract ULID from a line of text
pub fn extract_ulid(line: &str) -> Option<String> {
    // 26 characters of Crockford base32; the leading digit stays 0 for centuries
    for (i, window) in line.as_bytes().windows(26).enumerate() {
        if window[0] == b'0' && window.iter().all(u8::is_ascii_alphanumeric) {
            let candidate = &line[i..i + 26];
            let bounded = line[i + 26..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_ascii_alphanumeric());
            if bounded {
                return Some(candidate.to_string());
            }
        }
    }

    None
}

/// Macro for convenient command construction
///
/// Usage:
/// ```ignore
/// snap!(dir, "save", "notes.txt").assert_success()?;
/// snap!(dir, "restore", &checkpoint_id, "--stdout").assert_success()?;
/// ```
#[macro_export]
macro_rules! snap {
    ($dir:expr, $($arg:expr),*) => {{
        let mut cmd = $crate::common::cli::SnapCommand::new($dir);
        cmd.args(&[$($arg),*]);
        cmd
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ulid_extraction() {
        let line = "✓ Created checkpoint 01HXKJ7NVQW3Y2YMZK5VFZX3G8 (Manual checkpoint, 2 lines)";
        let id = extract_ulid(line);
        assert_eq!(id, Some("01HXKJ7NVQW3Y2YMZK5VFZX3G8".to_string()));
    }

    #[test]
    fn test_ulid_extraction_needs_full_token() {
        assert_eq!(extract_ulid("no id here"), None);
        assert_eq!(extract_ulid("01HXKJ7NVQW3Y2YMZK5VFZX3G8X"), None);
    }
}
