//! # Taskboard Core
//!
//! State engine for a three-column task board.
//!
//! Tasks live in a single master sequence and are partitioned into the
//! `todo`, `in-progress` and `done` columns by status. The crate reconciles
//! drag gestures into a new ordering, projects each column through a search
//! and sort filter, and persists whole-board snapshots in the background.
//! Rendering and input capture are left to the host.

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigError, StoreConfig};
pub use domain::{
    board::{BoardConfig, BoardState, Column},
    drag::{DragEvent, DragOutcome, IgnoreReason},
    task::{Task, TaskId, TaskStatus},
    view::{ColumnView, SortOrder, ViewQuery},
};
pub use error::{BoardError, Result};
pub use storage::{LoadStatus, PersistenceAdapter, Storage};
pub use store::{BoardStore, SaveOutcome, SaveReport};
