//! Terminal staff login for libdesk.
//!
//! `LoginPrompt` drives a pure reducer (`prompt::update`) from a
//! `PromptFrontend` and runs credential checks on tokio, reporting a
//! `LoginOutcome` when the prompt closes.

pub mod common;
pub mod effects;
pub mod events;
pub mod frontend;
pub mod host;
pub mod prompt;
pub mod runtime;
pub mod terminal;
pub mod views;

pub use frontend::{PromptFrontend, ScriptStep, ScriptedFrontend, TerminalFrontend};
pub use host::LoginListener;
pub use runtime::LoginPrompt;
