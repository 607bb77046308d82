use crate::error::Result;
use async_trait::async_trait;

pub mod adapter;
pub mod file_storage;
pub mod memory_storage;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

pub use adapter::{decode_snapshot, encode_snapshot, LoadStatus, Loaded, PersistenceAdapter};
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

#[cfg(feature = "sqlite-storage")]
pub use sqlite_storage::SqliteStorage;

/// Durable home of one board's snapshot
///
/// Backends only move opaque snapshot text; parsing and validation live
/// in [`PersistenceAdapter`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Prepares the storage medium
    async fn initialize(&self) -> Result<()>;

    /// Reads the raw snapshot, `None` when nothing has been saved yet
    async fn read_snapshot(&self) -> Result<Option<String>>;

    /// Replaces the snapshot. A concurrent reader sees either the old or
    /// the new snapshot, never a mix.
    async fn write_snapshot(&self, snapshot: &str) -> Result<()>;

    /// Checks if the storage has been initialized
    async fn is_initialized(&self) -> bool;
}
