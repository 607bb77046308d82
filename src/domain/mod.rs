pub mod board;
pub mod drag;
pub mod task;
pub mod view;

pub use board::{BoardConfig, BoardState, Column};
pub use drag::{apply_drag, DragEvent, DragOutcome, DropTarget, IgnoreReason};
pub use task::{Task, TaskId, TaskStatus};
pub use view::{board_view, column_view, sort_tasks, ColumnView, SortOrder, ViewQuery};
