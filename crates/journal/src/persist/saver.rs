//! Background save task
//!
//! Mutating store calls enqueue a state snapshot and return immediately. One
//! task drains the queue in order, so an older snapshot never overwrites a
//! newer one. Snapshots queued while a save is running collapse into the
//! latest.

use super::PersistenceGateway;
use crate::state::PersistedState;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

enum Request {
    Save(Box<PersistedState>),
    Flush(oneshot::Sender<()>),
}

/// Handle to the background save task
pub(crate) struct Saver {
    tx: mpsc::UnboundedSender<Request>,
}

impl Saver {
    /// Spawn the task on the current tokio runtime
    pub(crate) fn spawn(gateway: Arc<PersistenceGateway>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(gateway, rx));
        Self { tx }
    }

    /// Queue a save. Never blocks.
    pub(crate) fn schedule(&self, state: PersistedState) {
        if self.tx.send(Request::Save(Box::new(state))).is_err() {
            tracing::warn!("Save task is gone; checkpoint state not persisted");
        }
    }

    /// Wait until every save queued before this call has been attempted
    pub(crate) async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Request::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

async fn run(gateway: Arc<PersistenceGateway>, mut rx: mpsc::UnboundedReceiver<Request>) {
    while let Some(request) = rx.recv().await {
        let mut pending = None;
        let mut waiters = Vec::new();

        match request {
            Request::Save(state) => pending = Some(state),
            Request::Flush(done) => waiters.push(done),
        }

        // Coalesce whatever else is already queued
        while let Ok(request) = rx.try_recv() {
            match request {
                Request::Save(state) => pending = Some(state),
                Request::Flush(done) => waiters.push(done),
            }
        }

        if let Some(state) = pending {
            gateway.save(&state).await;
        }
        for done in waiters {
            let _ = done.send(());
        }
    }
    tracing::debug!("Save task stopped");
}
