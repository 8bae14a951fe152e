//! Login prompt behavior.
//!
//! The prompt is a small Elm-style slice:
//! - `state.rs`: `PromptState` (fields, focus, notice, phase)
//! - `update.rs`: the pure reducer and the key map
//!
//! Presentation lives in `views`, input sources in `frontend`, and side
//! effects in `runtime`. Nothing here touches the terminal or the network.

mod state;
mod update;

pub use state::{Field, Notice, NoticeLevel, Phase, PromptState};
pub use update::{input_for_key, update};

/// Toolkit-independent user input.
///
/// Front-ends translate their native events (key presses, scripted steps)
/// into these before handing them to the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    /// Type a character into the focused field.
    Insert(char),
    /// Insert pasted text into the focused field.
    Paste(String),
    Backspace,
    /// Clear the focused field.
    ClearField,
    FocusNext,
    FocusPrev,
    /// Username: move to password. Password: submit.
    Enter,
    Submit,
    Cancel,
    ToggleLayout,
    /// Replace a field's value wholesale (scripted input).
    Fill { field: Field, value: String },
    /// Terminal resized or otherwise needs repainting.
    Redraw,
}
