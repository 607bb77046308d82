use crate::{
    domain::{BoardState, Task},
    error::{BoardError, Result},
    storage::Storage,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a snapshot load went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// No snapshot saved yet
    Missing,
    /// Snapshot parsed; holds the number of tasks restored
    Restored(usize),
    /// Snapshot present but unusable; the board starts empty
    Corrupt(String),
    /// Storage could not be read; the board starts empty
    Unavailable(String),
}

impl LoadStatus {
    /// True when the board fell back to an empty state because of a problem
    pub fn is_degraded(&self) -> bool {
        matches!(self, LoadStatus::Corrupt(_) | LoadStatus::Unavailable(_))
    }
}

/// Board state obtained from storage, with the way it was obtained
#[derive(Debug, Clone)]
pub struct Loaded {
    pub state: BoardState,
    pub status: LoadStatus,
}

/// Serializes the master sequence as a JSON array
pub fn encode_snapshot(state: &BoardState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Parses and validates a snapshot
pub fn decode_snapshot(snapshot: &str) -> Result<BoardState> {
    let tasks: Vec<Task> = serde_json::from_str(snapshot)
        .map_err(|e| BoardError::CorruptSnapshot(e.to_string()))?;

    BoardState::from_tasks(tasks).map_err(|e| match e {
        BoardError::CorruptSnapshot(reason) => BoardError::CorruptSnapshot(reason),
        other => BoardError::CorruptSnapshot(other.to_string()),
    })
}

/// Loads and saves whole-board snapshots over a [`Storage`] backend
#[derive(Clone)]
pub struct PersistenceAdapter {
    storage: Arc<dyn Storage>,
}

impl PersistenceAdapter {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Loads the board. Never fails: a missing, corrupt or unreadable
    /// snapshot yields an empty board and a status describing why.
    pub async fn load(&self) -> Loaded {
        let raw = match self.storage.read_snapshot().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Board snapshot unavailable, starting with an empty board");
                return Loaded {
                    state: BoardState::new(),
                    status: LoadStatus::Unavailable(e.to_string()),
                };
            }
        };

        let Some(raw) = raw else {
            debug!("No board snapshot found");
            return Loaded {
                state: BoardState::new(),
                status: LoadStatus::Missing,
            };
        };

        match decode_snapshot(&raw) {
            Ok(state) => {
                info!(tasks = state.len(), "Restored board snapshot");
                let status = LoadStatus::Restored(state.len());
                Loaded { state, status }
            }
            Err(e) => {
                warn!(error = %e, "Discarding corrupt board snapshot");
                Loaded {
                    state: BoardState::new(),
                    status: LoadStatus::Corrupt(e.to_string()),
                }
            }
        }
    }

    /// Writes the full board, replacing the previous snapshot
    pub async fn save(&self, state: &BoardState) -> Result<()> {
        let snapshot = encode_snapshot(state)?;
        self.storage.write_snapshot(&snapshot).await?;
        debug!(tasks = state.len(), "Saved board snapshot");
        Ok(())
    }
}
