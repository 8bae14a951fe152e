use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};

use super::PromptFrontend;
use crate::prompt::{self, PromptInput, PromptState};
use crate::terminal::{self, PromptTerminal};
use crate::views;

/// Full-screen front-end on the user's terminal.
///
/// The terminal is restored when this value is dropped.
pub struct TerminalFrontend {
    terminal: PromptTerminal,
}

impl TerminalFrontend {
    /// Takes over the terminal.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be put in raw mode.
    pub fn new() -> Result<Self> {
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        Ok(Self { terminal })
    }
}

impl PromptFrontend for TerminalFrontend {
    fn render(&mut self, state: &PromptState) -> Result<()> {
        self.terminal
            .draw(|frame| views::render(frame, state))
            .context("Failed to draw login prompt")?;
        Ok(())
    }

    fn next_input(
        &mut self,
        _state: &PromptState,
        timeout: Duration,
    ) -> Result<Option<PromptInput>> {
        if !event::poll(timeout).context("Failed to poll terminal")? {
            return Ok(None);
        }
        let input = match event::read().context("Failed to read terminal event")? {
            Event::Key(key) => prompt::input_for_key(key),
            Event::Paste(text) => Some(PromptInput::Paste(text)),
            Event::Resize(..) => Some(PromptInput::Redraw),
            _ => None,
        };
        Ok(input)
    }
}

impl Drop for TerminalFrontend {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
