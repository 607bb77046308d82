use crate::{
    domain::task::{Task, TaskId, TaskStatus},
    error::{BoardError, Result},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Display configuration for a board column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub status: TaskStatus,
}

impl Column {
    pub fn new(name: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

/// Board configuration
///
/// Columns always cover the three statuses; the config only decides their
/// labels and display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub name: String,
    pub columns: Vec<Column>,
}

impl BoardConfig {
    /// Builds a config with custom labels. Statuses missing from `columns`
    /// are appended with their default label; duplicates are dropped.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        let mut seen = HashSet::new();
        let mut normalized: Vec<Column> = columns
            .into_iter()
            .filter(|col| seen.insert(col.status))
            .collect();

        for status in TaskStatus::ALL {
            if !seen.contains(&status) {
                normalized.push(Column::new(status.to_string(), status));
            }
        }

        Self {
            name: name.into(),
            columns: normalized,
        }
    }

    /// Gets the column configuration for a status
    pub fn column_for_status(&self, status: TaskStatus) -> Option<&Column> {
        self.columns.iter().find(|col| col.status == status)
    }

    /// Label shown for a status, falling back to the status' display name
    pub fn label(&self, status: TaskStatus) -> String {
        self.column_for_status(status)
            .map(|col| col.name.clone())
            .unwrap_or_else(|| status.to_string())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: "Task Board".to_string(),
            columns: TaskStatus::ALL
                .into_iter()
                .map(|status| Column::new(status.to_string(), status))
                .collect(),
        }
    }
}

/// The master sequence of tasks
///
/// Per-column order is the stable sub-sequence of tasks with that status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Task>", into = "Vec<Task>")]
pub struct BoardState {
    tasks: Vec<Task>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a state from an existing sequence, rejecting invalid records
    /// and duplicate ids.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self> {
        {
            let mut ids = HashSet::with_capacity(tasks.len());
            for task in &tasks {
                task.validate()?;
                if !ids.insert(task.id().as_str()) {
                    return Err(BoardError::CorruptSnapshot(format!(
                        "duplicate task id {}",
                        task.id()
                    )));
                }
            }
        }
        Ok(Self { tasks })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Appends a task at the end of the master sequence
    pub(crate) fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Removes a task, returning it if it was present
    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.position(id.as_str())?;
        Some(self.tasks.remove(index))
    }

    /// Index of a task in the master sequence
    pub fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id().as_str() == id)
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id().as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Tasks of one column in master order
    pub fn column(&self, status: TaskStatus) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |task| task.status() == status)
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        self.column(status).count()
    }

    pub(crate) fn set_status_at(&mut self, index: usize, status: TaskStatus) {
        if let Some(task) = self.tasks.get_mut(index) {
            task.set_status(status);
        }
    }

    /// Moves the element at `from` to `to`, shifting everything in between
    /// by one slot.
    pub(crate) fn relocate(&mut self, from: usize, to: usize) {
        if from == to || from >= self.tasks.len() || to >= self.tasks.len() {
            return;
        }
        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
    }
}

impl TryFrom<Vec<Task>> for BoardState {
    type Error = BoardError;

    fn try_from(tasks: Vec<Task>) -> Result<Self> {
        Self::from_tasks(tasks)
    }
}

impl From<BoardState> for Vec<Task> {
    fn from(state: BoardState) -> Self {
        state.tasks
    }
}
