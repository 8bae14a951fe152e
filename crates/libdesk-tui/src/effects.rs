//! Prompt effects.
//!
//! The reducer returns these instead of doing I/O. The runtime executes them:
//! spawning the credential check, signalling the host, writing the layout to
//! config, and cancelling an outstanding check through its token.

use libdesk_core::auth::Credentials;
use libdesk_core::config::PromptLayout;
use tokio_util::sync::CancellationToken;

use crate::common::TaskId;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Verify credentials off the UI thread.
    SpawnLoginCheck {
        task: TaskId,
        credentials: Credentials,
    },

    /// Fire the host's login-succeeded signal.
    NotifyHost,

    /// Persist the layout preference to config.
    PersistLayout { layout: PromptLayout },

    /// Cancel an in-progress task.
    CancelTask { token: Option<CancellationToken> },
}
