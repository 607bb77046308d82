//! Store configuration.
//!
//! Read from environment variables:
//! - `TASKBOARD_DATA_DIR` - Optional. Root directory for file storage. Defaults to `.`.
//! - `TASKBOARD_BOARD` - Optional. Logical board name. Defaults to `tasks`.
//! - `TASKBOARD_SORT` - Optional. Initial sort order (`recent`, `oldest`, `manual`). Defaults to `recent`.
//! - `TASKBOARD_LOG` - Optional. Tracing filter directive. Defaults to `taskboard_core=info`.

use crate::{domain::SortOrder, logging, storage::FileStorage};
use std::{path::PathBuf, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Root directory that holds the `.taskboard` folder
    pub data_dir: PathBuf,

    /// Name of the board; one snapshot per board
    pub board: String,

    /// Sort order the store starts with
    pub sort: SortOrder,

    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            board: "tasks".to_string(),
            sort: SortOrder::Recent,
            log_filter: "taskboard_core=info".to_string(),
        }
    }
}

impl StoreConfig {
    /// Loads configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_dir = lookup("TASKBOARD_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let board = match lookup("TASKBOARD_BOARD") {
            Some(board) => {
                validate_board_name(&board)?;
                board
            }
            None => defaults.board,
        };

        let sort = match lookup("TASKBOARD_SORT") {
            Some(sort) => SortOrder::from_str(&sort)
                .map_err(|e| ConfigError::InvalidValue("TASKBOARD_SORT".to_string(), e.to_string()))?,
            None => defaults.sort,
        };

        let log_filter = lookup("TASKBOARD_LOG").unwrap_or(defaults.log_filter);

        Ok(Self {
            data_dir,
            board,
            sort,
            log_filter,
        })
    }

    /// File storage for the configured board
    pub fn file_storage(&self) -> FileStorage {
        FileStorage::new(&self.data_dir, self.board.clone())
    }

    /// Installs the global subscriber with `log_filter` as the fallback
    /// directive. Returns `false` if one was already installed.
    pub fn init_logging(&self) -> bool {
        logging::init_logging(&self.log_filter)
    }
}

fn validate_board_name(board: &str) -> Result<(), ConfigError> {
    let valid = !board.is_empty()
        && board
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(
            "TASKBOARD_BOARD".to_string(),
            format!("'{}' must be non-empty and use only letters, digits, '-' or '_'", board),
        ))
    }
}
