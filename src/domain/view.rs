use crate::{
    domain::{
        board::{BoardConfig, BoardState},
        task::{Task, TaskStatus},
    },
    error::BoardError,
};
use std::{fmt, str::FromStr};

/// Order of tasks inside a column view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first
    #[default]
    Recent,
    /// Oldest first
    Oldest,
    /// Master sequence order, as left by drag reorders
    Manual,
}

impl FromStr for SortOrder {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recent" => Ok(SortOrder::Recent),
            "oldest" => Ok(SortOrder::Oldest),
            "manual" => Ok(SortOrder::Manual),
            _ => Err(BoardError::InvalidSortOrder(s.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recent => write!(f, "recent"),
            Self::Oldest => write!(f, "oldest"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// Search and sort criteria applied to every column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    pub sort: SortOrder,
}

impl ViewQuery {
    pub fn new(search: impl Into<String>, sort: SortOrder) -> Self {
        Self {
            search: search.into(),
            sort,
        }
    }
}

/// Ordered, filtered tasks of one column
///
/// An empty view is still a column: callers render their placeholder
/// when `is_empty()` holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    pub status: TaskStatus,
    pub name: String,
    pub tasks: Vec<Task>,
}

impl ColumnView {
    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.tasks.iter().map(Task::title).collect()
    }
}

/// Sorts tasks in place by creation time
///
/// The sort is stable, so equal timestamps keep their incoming order.
/// `Manual` leaves the slice untouched.
pub fn sort_tasks(tasks: &mut [Task], order: SortOrder) {
    match order {
        SortOrder::Recent => tasks.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
        SortOrder::Oldest => tasks.sort_by(|a, b| a.created_at().cmp(&b.created_at())),
        SortOrder::Manual => {}
    }
}

/// Projects one column of the board through the search and sort criteria
pub fn column_view(
    state: &BoardState,
    status: TaskStatus,
    name: impl Into<String>,
    query: &ViewQuery,
) -> ColumnView {
    let mut tasks: Vec<Task> = state
        .column(status)
        .filter(|task| task.matches(&query.search))
        .cloned()
        .collect();

    sort_tasks(&mut tasks, query.sort);

    ColumnView {
        status,
        name: name.into(),
        tasks,
    }
}

/// Projects every configured column, in display order
pub fn board_view(state: &BoardState, config: &BoardConfig, query: &ViewQuery) -> Vec<ColumnView> {
    config
        .columns
        .iter()
        .map(|col| column_view(state, col.status, col.name.clone(), query))
        .collect()
}
