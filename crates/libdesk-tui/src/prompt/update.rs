//! Prompt reducer.
//!
//! `update` is the only place prompt state changes. It performs no I/O: work
//! that leaves the process (credential checks, config writes, host signals)
//! is returned as `UiEffect`s for the runtime to execute.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use libdesk_core::auth::{Credentials, LoginOutcome};

use super::{Field, Notice, PromptInput, PromptState};
use crate::common::{TaskCompleted, text};
use crate::effects::UiEffect;
use crate::events::{LoginCheck, UiEvent};

/// Applies one event to the prompt and returns the effects to run.
///
/// A closed prompt is inert: every event is ignored and no effects are returned.
pub fn update(state: &mut PromptState, event: UiEvent) -> Vec<UiEffect> {
    if state.is_closed() {
        return Vec::new();
    }

    match event {
        UiEvent::Tick => {
            if state.is_checking() {
                state.spinner_frame = state.spinner_frame.wrapping_add(1);
            }
            Vec::new()
        }
        UiEvent::Input(input) => handle_input(state, input),
        UiEvent::TaskStarted(started) => {
            if state.check.active == Some(started.id) {
                state.check.on_started(&started);
            }
            Vec::new()
        }
        UiEvent::LoginChecked(completed) => handle_login_checked(state, completed),
    }
}

/// Maps a terminal key press to prompt input.
pub fn input_for_key(key: KeyEvent) -> Option<PromptInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => Some(PromptInput::Cancel),
        KeyCode::Char('c') if ctrl => Some(PromptInput::Cancel),
        KeyCode::Char('u') if ctrl => Some(PromptInput::ClearField),
        KeyCode::Char(c) if !ctrl => Some(PromptInput::Insert(c)),
        KeyCode::Enter => Some(PromptInput::Enter),
        KeyCode::Tab | KeyCode::Down => Some(PromptInput::FocusNext),
        KeyCode::BackTab | KeyCode::Up => Some(PromptInput::FocusPrev),
        KeyCode::Backspace => Some(PromptInput::Backspace),
        KeyCode::F(2) => Some(PromptInput::ToggleLayout),
        _ => None,
    }
}

fn handle_input(state: &mut PromptState, input: PromptInput) -> Vec<UiEffect> {
    match input {
        PromptInput::Cancel => cancel(state),
        PromptInput::ToggleLayout => {
            state.layout = state.layout.toggled();
            vec![UiEffect::PersistLayout {
                layout: state.layout,
            }]
        }
        PromptInput::Redraw => Vec::new(),
        // Fields are frozen while their values are being checked.
        _ if state.is_checking() => Vec::new(),
        PromptInput::Submit => submit(state),
        PromptInput::Enter => match state.focus {
            Field::Username => {
                state.focus = Field::Password;
                Vec::new()
            }
            Field::Password => submit(state),
        },
        PromptInput::FocusNext | PromptInput::FocusPrev => {
            state.focus = state.focus.other();
            Vec::new()
        }
        PromptInput::Insert(c) => {
            edit(state, |value| value.push(c));
            Vec::new()
        }
        PromptInput::Paste(text) => {
            // Fields are single-line.
            let text: String = text.chars().filter(|c| !c.is_control()).collect();
            edit(state, |value| value.push_str(&text));
            Vec::new()
        }
        PromptInput::Backspace => {
            edit(state, text::pop_grapheme);
            Vec::new()
        }
        PromptInput::ClearField => {
            edit(state, String::clear);
            Vec::new()
        }
        PromptInput::Fill { field, value } => {
            state.notice = None;
            *state.field_mut(field) = value;
            Vec::new()
        }
    }
}

fn edit(state: &mut PromptState, apply: impl FnOnce(&mut String)) {
    state.notice = None;
    let focus = state.focus;
    apply(state.field_mut(focus));
}

fn submit(state: &mut PromptState) -> Vec<UiEffect> {
    let Some(credentials) = Credentials::from_input(&state.username, &state.password) else {
        tracing::debug!("submit rejected locally: missing input");
        state.notice = Some(Notice::MissingInput);
        return Vec::new();
    };

    state.notice = None;
    let task = state.next_task_id();
    state.check.active = Some(task);
    tracing::info!(username = credentials.username(), "submitting credentials");
    vec![UiEffect::SpawnLoginCheck { task, credentials }]
}

fn cancel(state: &mut PromptState) -> Vec<UiEffect> {
    let pending = state.is_checking();
    let token = state.check.cancel.take();
    state.check.clear();
    state.close(LoginOutcome::Cancelled);
    tracing::info!(pending, "login prompt cancelled");

    if pending {
        vec![UiEffect::CancelTask { token }]
    } else {
        Vec::new()
    }
}

fn handle_login_checked(
    state: &mut PromptState,
    completed: TaskCompleted<LoginCheck>,
) -> Vec<UiEffect> {
    let TaskCompleted { id, result } = completed;
    if !state.check.finish_if_active(id) {
        return Vec::new();
    }

    match result {
        LoginCheck::Accepted(staff) => {
            tracing::info!(staff_id = staff.id, role_id = staff.role_id, "login succeeded");
            state.notice = Some(Notice::Welcome(staff.welcome_message()));
            state.close(LoginOutcome::Success(staff));
            vec![UiEffect::NotifyHost]
        }
        LoginCheck::Rejected => {
            state.rejected_attempts = state.rejected_attempts.saturating_add(1);
            state.notice = Some(Notice::AuthenticationRejected);
            tracing::info!(attempts = state.rejected_attempts, "login rejected");
            if state
                .attempt_limit
                .is_some_and(|limit| state.rejected_attempts >= limit)
            {
                state.close(LoginOutcome::Failure);
            }
            Vec::new()
        }
        LoginCheck::Unavailable(detail) => {
            tracing::warn!(%detail, "login service unavailable");
            state.notice = Some(Notice::ServiceUnavailable(detail));
            Vec::new()
        }
        LoginCheck::Cancelled => Vec::new(),
    }
}
