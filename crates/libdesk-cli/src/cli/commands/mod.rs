pub mod config;
pub mod login;
pub mod staff;

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

/// Reads a password from the first line of stdin, or asks for it on the
/// terminal with echo masked.
pub fn read_password(from_stdin: bool, prompt: &str) -> Result<String> {
    if from_stdin || !io::stdin().is_terminal() {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read password from stdin")?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }
    read_masked(prompt)
}

fn read_masked(prompt: &str) -> Result<String> {
    let mut err = io::stderr();
    write!(err, "{prompt}")?;
    err.flush()?;

    terminal::enable_raw_mode().context("Failed to enable raw mode")?;
    let result = read_masked_keys(&mut err);
    let _ = terminal::disable_raw_mode();
    writeln!(err)?;
    result
}

fn read_masked_keys(err: &mut io::Stderr) -> Result<String> {
    let mut password = String::new();
    loop {
        let Event::Key(key) = event::read().context("Failed to read terminal event")? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(password),
            KeyCode::Esc => anyhow::bail!("Password entry cancelled"),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                anyhow::bail!("Password entry cancelled")
            }
            KeyCode::Backspace => {
                if password.pop().is_some() {
                    write!(err, "\u{8} \u{8}")?;
                }
            }
            KeyCode::Char(c) => {
                password.push(c);
                write!(err, "•")?;
            }
            _ => continue,
        }
        err.flush()?;
    }
}
