//! Named branches of checkpoints

use crate::Checkpoint;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Name of the branch that always exists
pub const MAIN_BRANCH: &str = "main";

/// Mapping from branch name to its checkpoints, plus the active branch
///
/// Each list is stored oldest-first. Lists hold shared references to
/// immutable checkpoints, so copying a list is cheap and the copy evolves
/// independently of its source. There is no way to remove a branch; `main`
/// is created on construction and survives every operation.
#[derive(Debug, Clone)]
pub struct BranchRegistry {
    branches: BTreeMap<String, Vec<Arc<Checkpoint>>>,
    current: String,
}

impl Default for BranchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BranchRegistry {
    /// Registry with a single empty `main` branch, active
    pub fn new() -> Self {
        let mut branches = BTreeMap::new();
        branches.insert(MAIN_BRANCH.to_string(), Vec::new());
        Self {
            branches,
            current: MAIN_BRANCH.to_string(),
        }
    }

    /// Rebuild a registry from stored lists
    ///
    /// `main` is added if missing and an unknown `current` falls back to it.
    pub fn from_parts(mut branches: BTreeMap<String, Vec<Arc<Checkpoint>>>, current: &str) -> Self {
        branches.entry(MAIN_BRANCH.to_string()).or_default();
        let current = if branches.contains_key(current) {
            current.to_string()
        } else {
            MAIN_BRANCH.to_string()
        };
        Self { branches, current }
    }

    /// Name of the active branch
    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn contains(&self, name: &str) -> bool {
        self.branches.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Create `name` as a copy of `from` (default: the active branch)
    ///
    /// Fails if `name` is empty or taken, or if the source does not exist.
    pub fn create_branch(&mut self, name: &str, from: Option<&str>) -> bool {
        let name = name.trim();
        if name.is_empty() || self.branches.contains_key(name) {
            return false;
        }

        let source = from.unwrap_or(self.current.as_str());
        let Some(list) = self.branches.get(source) else {
            return false;
        };

        let copy = list.clone();
        self.branches.insert(name.to_string(), copy);
        true
    }

    /// Make `name` the active branch. Unknown names leave it unchanged.
    pub fn switch_branch(&mut self, name: &str) -> bool {
        if !self.branches.contains_key(name) {
            return false;
        }
        self.current = name.to_string();
        true
    }

    /// Branch names, `main` first, the rest in lexical order
    pub fn list_branches(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.branches.len());
        names.push(MAIN_BRANCH.to_string());
        names.extend(
            self.branches
                .keys()
                .filter(|name| name.as_str() != MAIN_BRANCH)
                .cloned(),
        );
        names
    }

    /// Checkpoints of `name`, oldest-first, or `None` for an unknown branch
    pub fn checkpoints(&self, name: &str) -> Option<&[Arc<Checkpoint>]> {
        self.branches.get(name).map(Vec::as_slice)
    }

    /// Checkpoints of the active branch, oldest-first
    pub fn current_checkpoints(&self) -> &[Arc<Checkpoint>] {
        self.checkpoints(&self.current).unwrap_or(&[])
    }

    /// Append to the active branch
    pub(crate) fn push(&mut self, checkpoint: Arc<Checkpoint>) {
        self.branches
            .entry(self.current.clone())
            .or_default()
            .push(checkpoint);
    }

    /// Append to a named branch, creating it if needed
    pub(crate) fn push_to(&mut self, name: &str, checkpoint: Arc<Checkpoint>) {
        self.branches.entry(name.to_string()).or_default().push(checkpoint);
    }

    /// Insert a whole branch if the name is free
    pub(crate) fn insert_if_absent(&mut self, name: &str, list: Vec<Arc<Checkpoint>>) -> bool {
        if self.branches.contains_key(name) {
            return false;
        }
        self.branches.insert(name.to_string(), list);
        true
    }

    /// Remove the checkpoint `id` from every list. Returns how many entries went.
    pub(crate) fn remove_id(&mut self, id: &str) -> usize {
        let mut removed = 0;
        for list in self.branches.values_mut() {
            let before = list.len();
            list.retain(|cp| cp.id != id);
            removed += before - list.len();
        }
        removed
    }

    /// Keep only checkpoints matching `keep`, in every list
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&Checkpoint) -> bool) {
        for list in self.branches.values_mut() {
            list.retain(|cp| keep(cp));
        }
    }

    /// Restore oldest-first order in every list after out-of-order inserts
    pub(crate) fn sort_oldest_first(&mut self) {
        for list in self.branches.values_mut() {
            list.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Arc<Checkpoint>>)> {
        self.branches.iter()
    }
}
