use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid task status: {0}")]
    InvalidStatus(String),

    #[error("Invalid sort order '{0}'. Valid orders: recent, oldest, manual")]
    InvalidSortOrder(String),

    #[error("Invalid task ID: {0:?}")]
    InvalidTaskId(String),

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
