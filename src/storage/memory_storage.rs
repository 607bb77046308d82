use crate::{
    error::{BoardError, Result},
    storage::Storage,
};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-local snapshot cell for session-only boards
pub struct MemoryStorage {
    snapshot: RwLock<Option<String>>,
    failing: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(None),
            failing: false,
        }
    }

    /// Starts with an existing snapshot
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot.into())),
            failing: false,
        }
    }

    /// A store whose reads and writes always fail
    pub fn failing() -> Self {
        Self {
            snapshot: RwLock::new(None),
            failing: true,
        }
    }

    /// The last written snapshot, bypassing the failure mode
    pub async fn current(&self) -> Option<String> {
        self.snapshot.read().await.clone()
    }

    fn check_available(&self) -> Result<()> {
        if self.failing {
            return Err(BoardError::StorageError(
                "memory storage is unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn initialize(&self) -> Result<()> {
        self.check_available()
    }

    async fn read_snapshot(&self) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.snapshot.read().await.clone())
    }

    async fn write_snapshot(&self, snapshot: &str) -> Result<()> {
        self.check_available()?;
        *self.snapshot.write().await = Some(snapshot.to_string());
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        !self.failing
    }
}
