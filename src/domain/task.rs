use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::error::{BoardError, Result};

/// Opaque unique identifier for a task
///
/// Fresh ids are UUID v4 strings. Ids restored from a snapshot are taken
/// as-is, so any non-empty string is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a new random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TaskId {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(BoardError::InvalidTaskId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Column a task lives in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// All columns in board order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Wire identifier, also used as the drop target id of an empty column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "in-progress" | "in_progress" | "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(BoardError::InvalidStatus(s.to_string())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Todo => write!(f, "To do"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Done => write!(f, "Done"),
        }
    }
}

/// A task on the board
///
/// `id` and `created_at` are fixed at construction. Only `status` can
/// change afterwards; position lives in the owning [`BoardState`].
///
/// [`BoardState`]: crate::domain::BoardState
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: TaskStatus,
    #[serde(alias = "date")]
    created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task stamped with the current time
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        status: TaskStatus,
    ) -> Result<Self> {
        Self::with_timestamp(title, description, status, Utc::now())
    }

    /// Creates a new task with an explicit creation time
    pub fn with_timestamp(
        title: impl Into<String>,
        description: impl Into<String>,
        status: TaskStatus,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let title = title.into();
        if title.is_empty() {
            return Err(BoardError::Validation("task title must not be empty".to_string()));
        }

        Ok(Self {
            id: TaskId::generate(),
            title,
            description: description.into(),
            status,
            created_at,
        })
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Case-insensitive substring match over title and description.
    /// An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }

    /// Checks the invariants a deserialized record has to satisfy
    pub(crate) fn validate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(BoardError::InvalidTaskId(self.id.to_string()));
        }
        if self.title.is_empty() {
            return Err(BoardError::Validation(format!(
                "task {} has an empty title",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_task_creation_defaults() {
        let task = Task::new("Write docs", "", TaskStatus::default()).unwrap();

        assert_eq!(task.title(), "Write docs");
        assert_eq!(task.description(), "");
        assert_eq!(task.status(), TaskStatus::Todo);
        assert!(!task.id().as_str().is_empty());
    }

    #[test]
    fn test_task_rejects_empty_title() {
        assert!(matches!(
            Task::new("", "desc", TaskStatus::Todo),
            Err(BoardError::Validation(_))
        ));
    }

    #[test]
    fn test_task_accepts_whitespace_title() {
        let task = Task::new("   ", "desc", TaskStatus::Done).unwrap();
        assert_eq!(task.title(), "   ");
        assert!(task.validate().is_ok());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Task::new("A", "", TaskStatus::Todo).unwrap();
        let b = Task::new("A", "", TaskStatus::Todo).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(TaskStatus::from_str("todo").unwrap(), TaskStatus::Todo);
        assert_eq!(TaskStatus::from_str("In-Progress").unwrap(), TaskStatus::InProgress);
        assert_eq!(TaskStatus::from_str("in_progress").unwrap(), TaskStatus::InProgress);
        assert_eq!(TaskStatus::from_str("DONE").unwrap(), TaskStatus::Done);
        assert!(TaskStatus::from_str("review").is_err());
        assert!(TaskStatus::from_str("").is_err());
    }

    #[test]
    fn test_status_wire_format() {
        for status in TaskStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert_eq!(TaskStatus::InProgress.to_string(), "In Progress");
    }

    #[test]
    fn test_task_id_parsing() {
        assert_eq!(TaskId::from_str("abc").unwrap().as_str(), "abc");
        assert!(TaskId::from_str("").is_err());
        assert!(TaskId::from_str("  ").is_err());
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let task = Task::new("Alpha release", "Ship the BETA notes", TaskStatus::Todo).unwrap();

        assert!(task.matches(""));
        assert!(task.matches("AL"));
        assert!(task.matches("beta"));
        assert!(!task.matches("gamma"));
    }

    #[test]
    fn test_deserialize_legacy_date_field() {
        let json = r#"{
            "id": "0b7c6d4e-1111-4a2b-9c3d-123456789abc",
            "title": "Old task",
            "description": "from an older snapshot",
            "status": "in-progress",
            "date": "2024-01-01T00:00:00.000Z"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status(), TaskStatus::InProgress);
        assert_eq!(
            task.created_at(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_deserialize_missing_description_and_status() {
        let json = r#"{"id": "t1", "title": "Bare", "created_at": "2024-01-01T00:00:00Z"}"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.description(), "");
        assert_eq!(task.status(), TaskStatus::Todo);
    }

    #[test]
    fn test_task_serialization_round_trip() {
        let task = Task::new("Round trip", "keeps every field", TaskStatus::Done).unwrap();
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }
}
