//! Read-only access to stored content: restore and compare

use crate::store::CheckpointStore;
use crate::Checkpoint;
use snapline_core::{diff, DiffResult};
use std::borrow::Cow;
use std::sync::Arc;

/// Supplier of the live buffer a checkpoint is compared against
///
/// The editor implements this; the store never reads editor state on its own.
pub trait ContentSource {
    /// Current text, or `None` if nothing is open
    fn current_content(&self) -> Option<Cow<'_, str>>;
}

impl ContentSource for String {
    fn current_content(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

impl ContentSource for &str {
    fn current_content(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(*self))
    }
}

impl<T: ContentSource> ContentSource for Option<T> {
    fn current_content(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(ContentSource::current_content)
    }
}

/// Content handed back by [`CheckpointStore::restore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    /// Text to put back into the editor
    pub content: String,
    pub checkpoint: Arc<Checkpoint>,
}

impl CheckpointStore {
    /// Fetch the content of a checkpoint for the caller to apply
    ///
    /// Nothing in the store changes.
    pub fn restore(&self, id: &str) -> Option<Restored> {
        let checkpoint = Arc::clone(self.get(id)?);
        tracing::debug!(id, file = %checkpoint.file_path, "Restoring checkpoint");
        Some(Restored {
            content: checkpoint.content.clone(),
            checkpoint,
        })
    }

    /// Positional diff from checkpoint `id_a` to `id_b`, or to live content
    ///
    /// Returns `None` if `id_a` is unknown, if `id_b` is given but unknown,
    /// or if `id_b` is absent and there is no live content.
    pub fn compare(
        &self,
        id_a: &str,
        id_b: Option<&str>,
        live: Option<&dyn ContentSource>,
    ) -> Option<DiffResult> {
        let a = self.get(id_a)?;
        match id_b {
            Some(id_b) => {
                let b = self.get(id_b)?;
                Some(diff(&a.content, &b.content))
            }
            None => {
                let current = live?.current_content()?;
                Some(diff(&a.content, &current))
            }
        }
    }
}
