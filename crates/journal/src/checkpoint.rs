//! Checkpoint data structures

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use snapline_core::{fingerprint, Fingerprint};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use ulid::Ulid;

/// Language tag used when the caller does not supply one
pub const DEFAULT_LANGUAGE: &str = "plaintext";

/// A full-content snapshot of one file at one point in time
///
/// Checkpoints are immutable once created. The store hands them out as
/// `Arc<Checkpoint>` and branch lists share the same instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Unique ID (ULID: creation time + random suffix)
    pub id: String,
    /// File this snapshot belongs to
    pub file_path: String,
    /// Full text of the file
    pub content: String,
    /// Display hint for syntax highlighting
    pub language: String,
    /// What triggered the checkpoint
    pub change_type: ChangeType,
    /// Human readable label
    pub description: String,
    /// Creation time (Unix milliseconds)
    pub timestamp: u64,
    /// Branch the checkpoint was created under
    pub branch: String,
    /// True if the user asked for this checkpoint
    pub manual: bool,
    /// Values derived from `content`
    pub metadata: CheckpointMeta,
}

/// What triggered a checkpoint. Classification only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    /// Regular edit in the editor
    #[default]
    Edit,
    /// Edit applied by the assistant
    AiEdit,
    /// Explicit user checkpoint
    Manual,
    /// File saved
    Save,
    /// Periodic automatic snapshot
    Auto,
}

impl ChangeType {
    /// Label used when no description is supplied
    pub fn default_description(self) -> &'static str {
        match self {
            ChangeType::Edit => "Edit",
            ChangeType::AiEdit => "AI edit",
            ChangeType::Manual => "Manual checkpoint",
            ChangeType::Save => "Saved",
            ChangeType::Auto => "Auto checkpoint",
        }
    }

    /// Wire name (`ai-edit`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::Edit => "edit",
            ChangeType::AiEdit => "ai-edit",
            ChangeType::Manual => "manual",
            ChangeType::Save => "save",
            ChangeType::Auto => "auto",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChangeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edit" => Ok(ChangeType::Edit),
            "ai-edit" => Ok(ChangeType::AiEdit),
            "manual" => Ok(ChangeType::Manual),
            "save" => Ok(ChangeType::Save),
            "auto" => Ok(ChangeType::Auto),
            other => Err(format!(
                "unknown change type '{other}' (expected edit, ai-edit, manual, save or auto)"
            )),
        }
    }
}

/// Metadata derived deterministically from checkpoint content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointMeta {
    /// Number of `\n` separated segments (an empty buffer has one line)
    pub lines: usize,
    /// Content length in UTF-16 code units
    pub size: usize,
    /// Display fingerprint
    pub hash: Fingerprint,
}

impl CheckpointMeta {
    /// Derive metadata from content
    pub fn from_content(content: &str) -> Self {
        Self {
            lines: content.split('\n').count(),
            size: content.encode_utf16().count(),
            hash: fingerprint(content),
        }
    }
}

/// Request to create a checkpoint
///
/// ```
/// use snapline_journal::{ChangeType, NewCheckpoint};
///
/// let request = NewCheckpoint::new("src/main.rs", "fn main() {}")
///     .language("rust")
///     .change_type(ChangeType::Save)
///     .manual(true);
/// assert_eq!(request.file_path, "src/main.rs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCheckpoint {
    pub file_path: String,
    pub content: String,
    pub language: Option<String>,
    pub change_type: ChangeType,
    pub description: Option<String>,
    pub manual: bool,
}

impl NewCheckpoint {
    pub fn new(file_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            content: content.into(),
            language: None,
            change_type: ChangeType::default(),
            description: None,
            manual: false,
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn change_type(mut self, change_type: ChangeType) -> Self {
        self.change_type = change_type;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn manual(mut self, manual: bool) -> Self {
        self.manual = manual;
        self
    }
}

/// Source of checkpoint IDs and timestamps
///
/// IDs are monotonic ULIDs and timestamps never go backwards within one
/// clock, even if the system time does.
#[derive(Default)]
pub struct CheckpointClock {
    inner: Mutex<ClockState>,
}

struct ClockState {
    generator: ulid::Generator,
    last_ms: u64,
}

impl Default for ClockState {
    fn default() -> Self {
        Self {
            generator: ulid::Generator::new(),
            last_ms: 0,
        }
    }
}

impl CheckpointClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next `(id, timestamp)` pair
    pub fn tick(&self) -> (Ulid, u64) {
        let mut state = self.inner.lock();
        let now = current_timestamp_ms().max(state.last_ms);
        state.last_ms = now;
        // Monotonic generation only fails when the random part overflows
        // within one millisecond; a fresh ULID is still unique.
        let id = state.generator.generate().unwrap_or_else(|_| Ulid::new());
        (id, now)
    }
}

impl Checkpoint {
    /// Build a checkpoint from a request
    ///
    /// Returns `None` when the request has no file path.
    pub fn build(request: NewCheckpoint, branch: &str, clock: &CheckpointClock) -> Option<Self> {
        if request.file_path.trim().is_empty() {
            return None;
        }

        let (id, timestamp) = clock.tick();
        let metadata = CheckpointMeta::from_content(&request.content);
        let description = request
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| request.change_type.default_description().to_string());

        Some(Self {
            id: id.to_string(),
            file_path: request.file_path,
            content: request.content,
            language: request
                .language
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            change_type: request.change_type,
            description,
            timestamp,
            branch: branch.to_string(),
            manual: request.manual,
            metadata,
        })
    }

    /// First 8 characters of the ID, for display
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

/// Current time in Unix milliseconds
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
