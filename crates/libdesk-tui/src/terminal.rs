//! Terminal lifecycle management.
//!
//! Terminal state is restored on:
//! - Normal exit (via `TerminalFrontend`'s Drop)
//! - Panic (via the panic hook)

use std::io::{self, Stderr};
use std::panic;
use std::sync::Once;

use anyhow::{Context, Result};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

/// The prompt draws on stderr so stdout stays free for command output.
pub type PromptTerminal = Terminal<CrosstermBackend<Stderr>>;

/// Enables raw mode, enters the alternate screen and turns on bracketed paste.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn setup_terminal() -> Result<PromptTerminal> {
    install_panic_hook();

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen, EnableBracketedPaste)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stderr);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restores terminal state.
///
/// This function is idempotent and safe to call multiple times.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn restore_terminal() -> Result<()> {
    // Must be disabled before leaving raw mode
    let _ = execute!(io::stderr(), DisableBracketedPaste);

    execute!(io::stderr(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")?;
    Ok(())
}

/// Installs (once) a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));
    });
}
