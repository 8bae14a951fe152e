//! Input and output for the prompt loop.
//!
//! - `terminal.rs`: full-screen ratatui front-end
//! - `scripted.rs`: pre-recorded input for headless logins and tests

mod scripted;
mod terminal;

use std::time::Duration;

use anyhow::Result;
pub use scripted::{ScriptStep, ScriptedFrontend};
pub use terminal::TerminalFrontend;

use crate::prompt::{PromptInput, PromptState};

/// Where the prompt loop reads input and draws state.
pub trait PromptFrontend {
    /// Draws the current state.
    ///
    /// # Errors
    /// Returns an error if the output device fails.
    fn render(&mut self, state: &PromptState) -> Result<()>;

    /// Waits up to `timeout` for the next input. `None` means nothing arrived.
    ///
    /// # Errors
    /// Returns an error if the input device fails.
    fn next_input(&mut self, state: &PromptState, timeout: Duration)
    -> Result<Option<PromptInput>>;
}
