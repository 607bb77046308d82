use crate::{
    error::{BoardError, Result},
    storage::Storage,
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::{
    path::Path,
    sync::{Arc, Mutex},
};

/// SQLite-backed snapshot store, one row per board
///
/// Every statement runs on tokio's blocking pool so the async callers never
/// wait on SQLite I/O from a runtime worker.
pub struct SqliteStorage {
    connection: Arc<Mutex<Connection>>,
    board: String,
}

fn storage_error(e: rusqlite::Error) -> BoardError {
    BoardError::StorageError(e.to_string())
}

impl SqliteStorage {
    /// Opens (or creates) the database file
    pub fn open(database_path: impl AsRef<Path>, board: impl Into<String>) -> Result<Self> {
        let connection = Connection::open(database_path).map_err(storage_error)?;
        Ok(Self::from_connection(connection, board))
    }

    /// Opens a private in-memory database
    pub fn open_in_memory(board: impl Into<String>) -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(storage_error)?;
        Ok(Self::from_connection(connection, board))
    }

    fn from_connection(connection: Connection, board: impl Into<String>) -> Self {
        Self {
            connection: Arc::new(Mutex::new(connection)),
            board: board.into(),
        }
    }

    /// Runs `f` against the connection on the blocking pool
    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &str) -> rusqlite::Result<T> + Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        let board = self.board.clone();

        tokio::task::spawn_blocking(move || {
            let connection = connection
                .lock()
                .map_err(|_| BoardError::StorageError("sqlite connection poisoned".to_string()))?;
            f(&connection, &board).map_err(storage_error)
        })
        .await
        .map_err(|e| BoardError::StorageError(format!("sqlite task failed: {}", e)))?
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn initialize(&self) -> Result<()> {
        self.with_connection(|conn, _| {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS snapshots (
                    board TEXT PRIMARY KEY,
                    body TEXT NOT NULL
                )",
                [],
            )
            .map(|_| ())
        })
        .await
    }

    async fn read_snapshot(&self) -> Result<Option<String>> {
        self.with_connection(|conn, board| {
            conn.query_row(
                "SELECT body FROM snapshots WHERE board = ?1",
                params![board],
                |row| row.get(0),
            )
            .optional()
        })
        .await
    }

    async fn write_snapshot(&self, snapshot: &str) -> Result<()> {
        let snapshot = snapshot.to_string();
        self.with_connection(move |conn, board| {
            conn.execute(
                "INSERT INTO snapshots (board, body) VALUES (?1, ?2)
                 ON CONFLICT(board) DO UPDATE SET body = excluded.body",
                params![board, snapshot],
            )
            .map(|_| ())
        })
        .await
    }

    async fn is_initialized(&self) -> bool {
        self.with_connection(|conn, _| {
            conn.query_row(
                "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = 'snapshots'",
                [],
                |row| row.get::<_, i64>(0),
            )
        })
        .await
        .map(|count| count > 0)
        .unwrap_or(false)
    }
}
