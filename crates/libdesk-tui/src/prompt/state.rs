use libdesk_core::auth::LoginOutcome;
use libdesk_core::config::PromptLayout;

use crate::common::{TaskId, TaskSeq, TaskState};

/// Input fields of the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Username,
    Password,
}

impl Field {
    pub fn other(self) -> Self {
        match self {
            Field::Username => Field::Password,
            Field::Password => Field::Username,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Username => "Username",
            Field::Password => "Password",
        }
    }
}

/// Inline message shown below the fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Either field was blank after trimming.
    MissingInput,
    /// The service said no. Wrong password, unknown user and locked account
    /// are deliberately indistinguishable.
    AuthenticationRejected,
    ServiceUnavailable(String),
    Welcome(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::MissingInput => "Missing information",
            Notice::AuthenticationRejected => "Login failed",
            Notice::ServiceUnavailable(_) => "Service unavailable",
            Notice::Welcome(_) => "Welcome",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::MissingInput => "Please enter both username and password.".to_string(),
            Notice::AuthenticationRejected => {
                "Wrong username, password, or account locked.".to_string()
            }
            Notice::ServiceUnavailable(detail) => {
                format!("Login service unavailable: {detail}")
            }
            Notice::Welcome(text) => text.clone(),
        }
    }

    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::MissingInput => NoticeLevel::Warning,
            Notice::AuthenticationRejected | Notice::ServiceUnavailable(_) => NoticeLevel::Error,
            Notice::Welcome(_) => NoticeLevel::Info,
        }
    }
}

/// Lifecycle of a prompt. `Closed` is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Open,
    Closed(LoginOutcome),
}

/// Complete state of one login prompt.
#[derive(Debug)]
pub struct PromptState {
    pub username: String,
    pub password: String,
    pub focus: Field,
    pub notice: Option<Notice>,
    pub layout: PromptLayout,
    pub phase: Phase,
    /// The outstanding credential check, if any.
    pub check: TaskState,
    pub rejected_attempts: u32,
    /// Rejections allowed before closing with `Failure`; `None` = unlimited.
    pub attempt_limit: Option<u32>,
    /// Advances on ticks while a check is outstanding.
    pub spinner_frame: usize,
    task_seq: TaskSeq,
}

impl PromptState {
    pub fn new(layout: PromptLayout) -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            focus: Field::Username,
            notice: None,
            layout,
            phase: Phase::Open,
            check: TaskState::default(),
            rejected_attempts: 0,
            attempt_limit: None,
            spinner_frame: 0,
            task_seq: TaskSeq::default(),
        }
    }

    /// Pre-fills the username and starts with the password focused.
    #[must_use]
    pub fn with_username(mut self, username: &str) -> Self {
        self.username = username.to_string();
        if !username.trim().is_empty() {
            self.focus = Field::Password;
        }
        self
    }

    #[must_use]
    pub fn with_attempt_limit(mut self, limit: Option<u32>) -> Self {
        self.attempt_limit = limit.filter(|limit| *limit > 0);
        self
    }

    pub fn is_open(&self) -> bool {
        matches!(self.phase, Phase::Open)
    }

    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }

    pub fn is_checking(&self) -> bool {
        self.check.is_running()
    }

    pub fn outcome(&self) -> Option<&LoginOutcome> {
        match &self.phase {
            Phase::Open => None,
            Phase::Closed(outcome) => Some(outcome),
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Password => &self.password,
        }
    }

    pub(super) fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
        }
    }

    pub(super) fn next_task_id(&mut self) -> TaskId {
        self.task_seq.next_id()
    }

    /// Moves to `Closed`. Only the first call has any effect.
    pub(super) fn close(&mut self, outcome: LoginOutcome) {
        if self.is_open() {
            self.phase = Phase::Closed(outcome);
        }
    }
}
