//! Background persistence for a board.
//!
//! Every mutation publishes the full board on a watch channel. The worker
//! only ever picks up the newest value, so bursts of edits collapse into
//! one write of the final state.

use crate::{domain::BoardState, storage::PersistenceAdapter};
use std::sync::Arc;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, error};

/// Result of the most recent save attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing has been saved yet
    Idle,
    Saved,
    Failed(String),
}

/// Save attempt for a given mutation generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub generation: u64,
    pub outcome: SaveOutcome,
}

#[derive(Debug, Clone)]
struct PendingSave {
    generation: u64,
    state: Arc<BoardState>,
}

pub(crate) struct SaveQueue {
    pending: watch::Sender<PendingSave>,
    reports: watch::Receiver<SaveReport>,
    generation: u64,
    worker: JoinHandle<()>,
}

impl SaveQueue {
    /// Spawns the save worker on the current tokio runtime
    pub(crate) fn spawn(adapter: PersistenceAdapter, initial: &BoardState) -> Self {
        let (pending, pending_rx) = watch::channel(PendingSave {
            generation: 0,
            state: Arc::new(initial.clone()),
        });
        let (report_tx, reports) = watch::channel(SaveReport {
            generation: 0,
            outcome: SaveOutcome::Idle,
        });

        let worker = tokio::spawn(run_worker(adapter, pending_rx, report_tx));

        Self {
            pending,
            reports,
            generation: 0,
            worker,
        }
    }

    /// Queues the given state, superseding anything not yet written
    pub(crate) fn enqueue(&mut self, state: &BoardState) -> u64 {
        self.generation += 1;
        self.pending.send_replace(PendingSave {
            generation: self.generation,
            state: Arc::new(state.clone()),
        });
        self.generation
    }

    pub(crate) fn last_report(&self) -> SaveReport {
        self.reports.borrow().clone()
    }

    /// Waits until the latest queued state has been attempted
    pub(crate) async fn flush(&self) -> SaveReport {
        let target = self.generation;
        let mut reports = self.reports.clone();
        let result = reports
            .wait_for(|report| report.generation >= target)
            .await
            .map(|report| (*report).clone());
        match result {
            Ok(report) => report,
            Err(_) => self.last_report(),
        }
    }

    /// Stops accepting saves and waits for the worker to write the last one
    pub(crate) async fn close(self) -> SaveReport {
        let SaveQueue {
            pending,
            reports,
            worker,
            ..
        } = self;
        drop(pending);
        if let Err(e) = worker.await {
            error!(error = %e, "Save worker ended abnormally");
        }
        let report = reports.borrow().clone();
        report
    }
}

async fn run_worker(
    adapter: PersistenceAdapter,
    mut pending: watch::Receiver<PendingSave>,
    reports: watch::Sender<SaveReport>,
) {
    while pending.changed().await.is_ok() {
        let PendingSave { generation, state } = pending.borrow_and_update().clone();

        let outcome = match adapter.save(&state).await {
            Ok(()) => SaveOutcome::Saved,
            Err(e) => {
                error!(generation, error = %e, "Failed to save board snapshot");
                SaveOutcome::Failed(e.to_string())
            }
        };

        reports.send_replace(SaveReport {
            generation,
            outcome,
        });
    }
    debug!("Save worker stopped");
}
