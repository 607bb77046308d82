//! Reconciles a drop gesture into a new master sequence.
//!
//! A drop on a card of the same column relocates the dragged card inside
//! the master sequence. A drop on a card of another column, or on a bare
//! column, only changes the dragged card's status; its master position
//! stays where it was and the column view places it by timestamp.

use crate::domain::{
    board::BoardState,
    task::{TaskId, TaskStatus},
};
use serde::{Deserialize, Serialize};

/// Abstract drop signal from the input layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEvent {
    #[serde(alias = "activeId")]
    pub active_id: String,
    #[serde(default, alias = "overId")]
    pub over_id: Option<String>,
}

impl DragEvent {
    pub fn new(active_id: impl Into<String>, over_id: Option<impl Into<String>>) -> Self {
        Self {
            active_id: active_id.into(),
            over_id: over_id.map(Into::into),
        }
    }
}

/// What the `over_id` of a drop resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Task { index: usize, status: TaskStatus },
    Column(TaskStatus),
}

/// Why a drop left the board untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Dropped outside any valid target
    NoTarget,
    UnknownActive,
    UnknownTarget,
    /// Dropped onto itself
    SamePosition,
    /// Dropped onto the column it already belongs to
    SameColumn,
}

/// A planned, not yet applied, change to the master sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragTransition {
    Reorder { from: usize, to: usize },
    Move { index: usize, to: TaskStatus },
    Ignore(IgnoreReason),
}

/// Result of applying a drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    Reordered {
        id: TaskId,
        from: usize,
        to: usize,
    },
    Moved {
        id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },
    Ignored(IgnoreReason),
}

impl DragOutcome {
    /// Whether the master sequence changed
    pub fn changed(&self) -> bool {
        !matches!(self, DragOutcome::Ignored(_))
    }
}

/// Resolves a drop target id. Task ids win over column identifiers, and
/// column identifiers must match a wire id exactly.
pub fn resolve_target(state: &BoardState, over_id: &str) -> Option<DropTarget> {
    if let Some(index) = state.position(over_id) {
        let status = state.tasks()[index].status();
        return Some(DropTarget::Task { index, status });
    }
    TaskStatus::ALL
        .into_iter()
        .find(|status| status.as_str() == over_id)
        .map(DropTarget::Column)
}

/// Works out the transition for a drop without touching the state
pub fn plan(state: &BoardState, event: &DragEvent) -> DragTransition {
    let Some(over_id) = event.over_id.as_deref() else {
        return DragTransition::Ignore(IgnoreReason::NoTarget);
    };
    let Some(from) = state.position(&event.active_id) else {
        return DragTransition::Ignore(IgnoreReason::UnknownActive);
    };
    let Some(target) = resolve_target(state, over_id) else {
        return DragTransition::Ignore(IgnoreReason::UnknownTarget);
    };

    let current = state.tasks()[from].status();
    match target {
        DropTarget::Task { index, status } if status == current => {
            if index == from {
                DragTransition::Ignore(IgnoreReason::SamePosition)
            } else {
                DragTransition::Reorder { from, to: index }
            }
        }
        DropTarget::Task { status, .. } => DragTransition::Move {
            index: from,
            to: status,
        },
        DropTarget::Column(status) if status == current => {
            DragTransition::Ignore(IgnoreReason::SameColumn)
        }
        DropTarget::Column(status) => DragTransition::Move {
            index: from,
            to: status,
        },
    }
}

impl DragTransition {
    /// Applies the planned change. Must be called on the state it was
    /// planned against.
    pub fn apply(self, state: &mut BoardState) -> DragOutcome {
        match self {
            DragTransition::Reorder { from, to } => {
                let id = state.tasks()[from].id().clone();
                state.relocate(from, to);
                DragOutcome::Reordered { id, from, to }
            }
            DragTransition::Move { index, to } => {
                let task = &state.tasks()[index];
                let id = task.id().clone();
                let from = task.status();
                state.set_status_at(index, to);
                DragOutcome::Moved { id, from, to }
            }
            DragTransition::Ignore(reason) => DragOutcome::Ignored(reason),
        }
    }
}

/// Plans and applies a drop in one step
pub fn apply_drag(state: &mut BoardState, event: &DragEvent) -> DragOutcome {
    plan(state, event).apply(state)
}
