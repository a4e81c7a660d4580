//! Serialized shapes of the engine state

use crate::branch::{BranchRegistry, MAIN_BRANCH};
use crate::Checkpoint;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

/// Current export format version
pub const EXPORT_VERSION: u32 = 1;

/// Full engine state as written to storage backends
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    /// Every checkpoint, newest-first
    pub checkpoints: Vec<Arc<Checkpoint>>,
    /// Branch name to checkpoints, oldest-first
    pub branches: BTreeMap<String, Vec<Arc<Checkpoint>>>,
    pub current_branch: String,
    /// Unix milliseconds
    pub saved_at: u64,
}

/// Portable dump of the engine produced by export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub checkpoints: Vec<Arc<Checkpoint>>,
    pub branches: BTreeMap<String, Vec<Arc<Checkpoint>>>,
    pub current_branch: String,
    /// Unix milliseconds
    pub exported_at: u64,
    pub version: u32,
}

/// Outcome of an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Checkpoints whose ids were not known before
    pub checkpoints_added: usize,
    /// Branch names that were not known before
    pub branches_added: usize,
    /// Checkpoints dropped afterwards to honor the cap
    pub evicted: usize,
}

/// Snapshot the in-memory structures
pub(crate) fn capture(
    global: &VecDeque<Arc<Checkpoint>>,
    registry: &BranchRegistry,
) -> (Vec<Arc<Checkpoint>>, BTreeMap<String, Vec<Arc<Checkpoint>>>) {
    let checkpoints = global.iter().cloned().collect();
    let branches = registry
        .iter()
        .map(|(name, list)| (name.clone(), list.clone()))
        .collect();
    (checkpoints, branches)
}

/// Rebuild in-memory structures from stored lists
///
/// Branch entries are re-pointed at the global instances with the same id,
/// entries whose id is not in the global list are dropped, and the global
/// list is ordered newest-first.
pub(crate) fn restore(
    checkpoints: Vec<Arc<Checkpoint>>,
    branches: BTreeMap<String, Vec<Arc<Checkpoint>>>,
    current_branch: &str,
) -> (VecDeque<Arc<Checkpoint>>, BranchRegistry) {
    let mut global: Vec<Arc<Checkpoint>> = Vec::with_capacity(checkpoints.len());
    let mut by_id: AHashMap<String, Arc<Checkpoint>> = AHashMap::with_capacity(checkpoints.len());
    for cp in checkpoints {
        if by_id.contains_key(&cp.id) {
            continue;
        }
        by_id.insert(cp.id.clone(), cp.clone());
        global.push(cp);
    }
    sort_newest_first(&mut global);

    let branches = branches
        .into_iter()
        .map(|(name, list)| {
            let list = list
                .into_iter()
                .filter_map(|cp| by_id.get(&cp.id).cloned())
                .collect();
            (name, list)
        })
        .collect();

    let current = if current_branch.is_empty() {
        MAIN_BRANCH
    } else {
        current_branch
    };
    (global.into(), BranchRegistry::from_parts(branches, current))
}

/// Newest-first by timestamp, ties broken by id (ULIDs sort by time)
pub(crate) fn sort_newest_first(list: &mut [Arc<Checkpoint>]) {
    list.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.id.cmp(&a.id))
    });
}
