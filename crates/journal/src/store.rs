//! The checkpoint store: global timeline, branches and background persistence

use crate::branch::BranchRegistry;
use crate::checkpoint::{current_timestamp_ms, Checkpoint, CheckpointClock, NewCheckpoint};
use crate::config::EngineConfig;
use crate::persist::{PersistenceGateway, Saver};
use crate::retention::RetentionPolicy;
use crate::state::{self, ExportBundle, ImportReport, PersistedState, EXPORT_VERSION};
use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;
use std::sync::Arc;

/// In-memory checkpoint store
///
/// Holds every checkpoint in one newest-first list and the branch lists that
/// reference them. The store is an ordinary value: construct it once and hand
/// `&mut CheckpointStore` to whatever needs it.
///
/// Mutations return immediately. When the store was opened with a
/// [`PersistenceGateway`], each mutation queues a save of the full state on a
/// background task; failures there are logged and never reach the caller.
pub struct CheckpointStore {
    config: EngineConfig,
    retention: RetentionPolicy,
    /// Newest-first
    global: VecDeque<Arc<Checkpoint>>,
    branches: BranchRegistry,
    clock: CheckpointClock,
    saver: Option<Saver>,
}

/// Summary numbers for status displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub total: usize,
    pub branches: usize,
    pub current_branch: String,
    /// Checkpoint count per file, sorted by path
    pub files: Vec<(String, usize)>,
    /// Sum of content sizes
    pub bytes: usize,
    pub max_checkpoints: usize,
    pub auto_save: bool,
}

impl CheckpointStore {
    /// Store without persistence
    pub fn in_memory(config: EngineConfig) -> Self {
        Self {
            retention: config.retention(),
            config,
            global: VecDeque::new(),
            branches: BranchRegistry::new(),
            clock: CheckpointClock::new(),
            saver: None,
        }
    }

    /// Load saved state through `gateway` and persist future changes to it
    ///
    /// Missing or unreadable state starts an empty `main` branch. Must be
    /// called inside a tokio runtime; the save task is spawned on it.
    pub async fn open(config: EngineConfig, gateway: Arc<PersistenceGateway>) -> Self {
        let mut store = Self::in_memory(config);
        tracing::debug!(
            key = gateway.key(),
            backends = ?gateway.backend_names(),
            "Opening checkpoint store"
        );

        if let Some(saved) = gateway.load().await {
            let (global, branches) =
                state::restore(saved.checkpoints, saved.branches, &saved.current_branch);
            store.global = global;
            store.branches = branches;
            tracing::debug!(
                checkpoints = store.global.len(),
                branches = store.branches.len(),
                "Restored checkpoint state"
            );
        } else {
            tracing::debug!("No saved checkpoint state; starting empty");
        }

        store.saver = Some(Saver::spawn(gateway));
        if store.evict_overflow() > 0 {
            store.persist();
        }
        store
    }

    /// Wait for every queued save to be attempted
    pub async fn flush(&self) {
        if let Some(saver) = &self.saver {
            saver.flush().await;
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_persistent(&self) -> bool {
        self.saver.is_some()
    }

    /// Record a snapshot on the active branch
    ///
    /// Returns `None` if the request has no file path, or if it is automatic
    /// (`manual == false`) while auto-save is off. May evict the globally
    /// oldest checkpoint to stay within the cap.
    pub fn create(&mut self, request: NewCheckpoint) -> Option<Arc<Checkpoint>> {
        if !request.manual && !self.config.auto_save {
            tracing::trace!(file = %request.file_path, "Auto-save disabled; skipping checkpoint");
            return None;
        }

        let checkpoint = Arc::new(Checkpoint::build(request, self.branches.current(), &self.clock)?);
        self.global.push_front(checkpoint.clone());
        self.branches.push(checkpoint.clone());

        tracing::debug!(
            id = %checkpoint.id,
            file = %checkpoint.file_path,
            branch = %checkpoint.branch,
            change = %checkpoint.change_type,
            "Created checkpoint"
        );

        self.evict_overflow();
        self.persist();
        Some(checkpoint)
    }

    /// Look up a checkpoint by id on any branch
    pub fn get(&self, id: &str) -> Option<&Arc<Checkpoint>> {
        self.global.iter().find(|cp| cp.id == id)
    }

    /// Every checkpoint of `file_path`, newest-first, across branches
    pub fn get_for_file(&self, file_path: &str) -> Vec<Arc<Checkpoint>> {
        self.global
            .iter()
            .filter(|cp| cp.file_path == file_path)
            .cloned()
            .collect()
    }

    /// Every checkpoint, newest-first
    pub fn checkpoints(&self) -> impl Iterator<Item = &Arc<Checkpoint>> {
        self.global.iter()
    }

    pub fn len(&self) -> usize {
        self.global.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty()
    }

    /// Remove a checkpoint from the timeline and every branch list
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(pos) = self.global.iter().position(|cp| cp.id == id) else {
            return false;
        };
        self.global.remove(pos);
        self.branches.remove_id(id);
        tracing::debug!(id, "Deleted checkpoint");
        self.persist();
        true
    }

    /// Remove the checkpoints of one file, or reset everything
    ///
    /// With `None` the store goes back to a single empty, active `main`.
    pub fn clear(&mut self, file_path: Option<&str>) {
        match file_path {
            Some(path) => {
                let before = self.global.len();
                self.global.retain(|cp| cp.file_path != path);
                self.branches.retain(|cp| cp.file_path != path);
                tracing::debug!(file = path, removed = before - self.global.len(), "Cleared file checkpoints");
            }
            None => {
                self.global.clear();
                self.branches = BranchRegistry::new();
                tracing::debug!("Cleared all checkpoints");
            }
        }
        self.persist();
    }

    /// Gate automatic (non-manual) checkpoints
    pub fn set_auto_save(&mut self, enabled: bool) {
        self.config.auto_save = enabled;
    }

    pub fn auto_save(&self) -> bool {
        self.config.auto_save
    }

    /// Change the cap, evicting right away if the store is over it
    ///
    /// Returns the number of evicted checkpoints.
    pub fn set_max_checkpoints(&mut self, max: usize) -> usize {
        self.retention = RetentionPolicy::new(max);
        self.config.max_checkpoints = self.retention.max_checkpoints;
        let evicted = self.evict_overflow();
        if evicted > 0 {
            self.persist();
        }
        evicted
    }

    // Branches

    /// Copy `from` (default: the active branch) into a new branch `name`
    pub fn create_branch(&mut self, name: &str, from: Option<&str>) -> bool {
        let created = self.branches.create_branch(name, from);
        if created {
            tracing::debug!(name, from = from.unwrap_or(self.branches.current()), "Created branch");
            self.persist();
        }
        created
    }

    /// Make `name` the branch future checkpoints attach to
    pub fn switch_branch(&mut self, name: &str) -> bool {
        let switched = self.branches.switch_branch(name);
        if switched {
            tracing::debug!(name, "Switched branch");
            self.persist();
        }
        switched
    }

    pub fn current_branch(&self) -> &str {
        self.branches.current()
    }

    /// Branch names, `main` first
    pub fn list_branches(&self) -> Vec<String> {
        self.branches.list_branches()
    }

    /// Checkpoints of a branch in storage order (oldest-first)
    pub fn list_checkpoints(&self, branch: &str) -> Option<&[Arc<Checkpoint>]> {
        self.branches.checkpoints(branch)
    }

    /// Checkpoints of the active branch, newest-first
    pub fn current_branch_checkpoints(&self) -> Vec<Arc<Checkpoint>> {
        self.branches.current_checkpoints().iter().rev().cloned().collect()
    }

    // Stats, export and import

    pub fn stats(&self) -> StoreStats {
        let mut per_file: AHashMap<&str, usize> = AHashMap::new();
        let mut bytes = 0;
        for cp in &self.global {
            *per_file.entry(cp.file_path.as_str()).or_default() += 1;
            bytes += cp.metadata.size;
        }
        let mut files: Vec<(String, usize)> = per_file
            .into_iter()
            .map(|(path, count)| (path.to_string(), count))
            .collect();
        files.sort();

        StoreStats {
            total: self.global.len(),
            branches: self.branches.len(),
            current_branch: self.branches.current().to_string(),
            files,
            bytes,
            max_checkpoints: self.retention.max_checkpoints,
            auto_save: self.config.auto_save,
        }
    }

    /// Dump the whole store
    pub fn export(&self) -> ExportBundle {
        let (checkpoints, branches) = state::capture(&self.global, &self.branches);
        ExportBundle {
            checkpoints,
            branches,
            current_branch: self.branches.current().to_string(),
            exported_at: current_timestamp_ms(),
            version: EXPORT_VERSION,
        }
    }

    /// Merge an export into this store
    ///
    /// Checkpoints whose id is already present are skipped. Branches are
    /// only added, never overwritten. A new checkpoint whose branch already
    /// existed here is appended to that branch. The active branch does not
    /// change. Returns `None` for bundles from a newer format version.
    pub fn import(&mut self, bundle: ExportBundle) -> Option<ImportReport> {
        if bundle.version > EXPORT_VERSION {
            tracing::warn!(
                version = bundle.version,
                supported = EXPORT_VERSION,
                "Refusing to import checkpoints from a newer format"
            );
            return None;
        }

        let mut report = ImportReport::default();
        let known_branches: AHashSet<String> = self.branches.list_branches().into_iter().collect();
        let mut known_ids: AHashSet<String> = self.global.iter().map(|cp| cp.id.clone()).collect();

        let mut added = Vec::new();
        for cp in bundle.checkpoints {
            if known_ids.insert(cp.id.clone()) {
                added.push(cp);
            }
        }
        report.checkpoints_added = added.len();

        let mut all: Vec<Arc<Checkpoint>> = self.global.drain(..).chain(added.iter().cloned()).collect();
        state::sort_newest_first(&mut all);
        self.global = all.into();

        let by_id: AHashMap<&str, &Arc<Checkpoint>> =
            self.global.iter().map(|cp| (cp.id.as_str(), cp)).collect();

        // (branch, id) pairs that arrived inside a bundle branch list
        let mut placed: AHashSet<(String, String)> = AHashSet::new();
        for (name, list) in bundle.branches {
            if known_branches.contains(&name) {
                continue;
            }
            let list: Vec<Arc<Checkpoint>> = list
                .iter()
                .filter_map(|cp| by_id.get(cp.id.as_str()).map(|shared| Arc::clone(shared)))
                .collect();
            let entries: Vec<(String, String)> =
                list.iter().map(|cp| (name.clone(), cp.id.clone())).collect();
            if self.branches.insert_if_absent(&name, list) {
                report.branches_added += 1;
                placed.extend(entries);
            }
        }

        // Every new checkpoint ends up on its owning branch, oldest-first
        for cp in added.iter().rev() {
            let Some(shared) = by_id.get(cp.id.as_str()) else {
                continue;
            };
            if placed.contains(&(cp.branch.clone(), cp.id.clone())) {
                continue;
            }
            if !self.branches.contains(&cp.branch) {
                report.branches_added += 1;
            }
            self.branches.push_to(&cp.branch, Arc::clone(shared));
        }
        drop(by_id);
        self.branches.sort_oldest_first();

        report.evicted = self.evict_overflow();
        tracing::debug!(
            added = report.checkpoints_added,
            branches = report.branches_added,
            evicted = report.evicted,
            "Imported checkpoints"
        );
        self.persist();
        Some(report)
    }

    // Internals

    /// Drop the globally oldest checkpoints until the cap holds
    fn evict_overflow(&mut self) -> usize {
        let excess = self.retention.overflow(self.global.len());
        for _ in 0..excess {
            if let Some(oldest) = self.global.pop_back() {
                self.branches.remove_id(&oldest.id);
                tracing::debug!(
                    id = %oldest.id,
                    file = %oldest.file_path,
                    branch = %oldest.branch,
                    "Evicted oldest checkpoint"
                );
            }
        }
        excess
    }

    /// Queue a save of the current state, if persistence is attached
    fn persist(&self) {
        let Some(saver) = &self.saver else {
            return;
        };
        let (checkpoints, branches) = state::capture(&self.global, &self.branches);
        saver.schedule(PersistedState {
            checkpoints,
            branches,
            current_branch: self.branches.current().to_string(),
            saved_at: current_timestamp_ms(),
        });
    }
}
