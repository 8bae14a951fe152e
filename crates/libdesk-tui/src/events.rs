//! Events consumed by the prompt reducer.

use libdesk_core::auth::AuthenticatedStaff;

use crate::common::{TaskCompleted, TaskStarted};
use crate::prompt::PromptInput;

/// Result of one background credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginCheck {
    Accepted(AuthenticatedStaff),
    Rejected,
    /// The service failed, timed out, or reported no session.
    Unavailable(String),
    /// The check was cancelled before it finished.
    Cancelled,
}

#[derive(Debug)]
pub enum UiEvent {
    /// Animation tick while a check is outstanding.
    Tick,
    /// User input from the front-end.
    Input(PromptInput),
    TaskStarted(TaskStarted),
    LoginChecked(TaskCompleted<LoginCheck>),
}
