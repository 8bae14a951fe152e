//! Shared helpers for the login TUI.

pub mod task;
pub mod text;

pub use task::{TaskCompleted, TaskId, TaskSeq, TaskStarted, TaskState};
pub use text::{mask, truncate_start_with_ellipsis};
