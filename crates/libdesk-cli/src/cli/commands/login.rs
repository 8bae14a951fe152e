//! Login command handler.

use std::fmt;
use std::io::{IsTerminal, stderr};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use libdesk_core::auth::{AuthService, LoginOutcome, StaffAuthService};
use libdesk_core::config::{Config, PromptLayout};
use libdesk_tui::prompt::{Field, Notice, PromptInput};
use libdesk_tui::{LoginPrompt, ScriptStep, ScriptedFrontend, TerminalFrontend};

/// The user dismissed the login prompt. `main` maps this to exit code 130.
#[derive(Debug)]
pub struct LoginCancelled;

impl fmt::Display for LoginCancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("login cancelled")
    }
}

impl std::error::Error for LoginCancelled {}

pub struct LoginOptions {
    pub layout: Option<PromptLayout>,
    pub username: Option<String>,
    pub password_stdin: bool,
}

pub async fn run(config: &Config, options: LoginOptions) -> Result<()> {
    let service = Arc::new(StaffAuthService::from_config(config));
    if !service.path().exists() {
        bail!(
            "No staff directory at {}.\nAdd an account with `libdesk staff add`.",
            service.path().display()
        );
    }

    let mut config = config.clone();
    if let Some(layout) = options.layout {
        config.layout = layout;
    }

    let auth = Arc::clone(&service) as Arc<dyn AuthService>;
    let mut prompt = LoginPrompt::from_config(auth, &config)?.with_listener(|| {
        tracing::info!("login signal received, refreshing permissions");
    });
    if let Some(username) = options.username.as_deref() {
        prompt = prompt.with_username(username);
    }

    let interactive = !options.password_stdin && stderr().is_terminal();
    let outcome = if interactive {
        let mut frontend = TerminalFrontend::new()?;
        prompt.run(&mut frontend)?
    } else {
        run_headless(prompt, options)?
    };

    report(outcome, service.as_ref()).await
}

/// Logs in with one scripted attempt: username from the flag, password from stdin.
fn run_headless(prompt: LoginPrompt, options: LoginOptions) -> Result<LoginOutcome> {
    let username = options
        .username
        .context("--username is required when the prompt cannot be shown")?;
    let password = super::read_password(true, "Password: ")?;

    let mut prompt = prompt.with_attempt_limit(Some(1));
    let mut frontend = ScriptedFrontend::new(headless_script(username, password));
    let outcome = prompt.run(&mut frontend)?;

    // A script that ends with the prompt still open means the attempt never
    // got an answer; surface why.
    if outcome == LoginOutcome::Cancelled
        && let Some(notice) = frontend.last_notice()
    {
        bail!("{}", notice.message());
    }
    Ok(outcome)
}

fn headless_script(username: String, password: String) -> Vec<ScriptStep> {
    vec![
        ScriptStep::Input(PromptInput::Fill {
            field: Field::Username,
            value: username,
        }),
        ScriptStep::Input(PromptInput::Fill {
            field: Field::Password,
            value: password,
        }),
        ScriptStep::Input(PromptInput::Submit),
        ScriptStep::Settle,
    ]
}

async fn report(outcome: LoginOutcome, auth: &dyn AuthService) -> Result<()> {
    match outcome {
        LoginOutcome::Success(_) => {
            let staff = auth
                .current_staff()
                .await?
                .context("no current staff after login")?;
            println!("{}", staff.welcome_message());

            let permissions: Vec<&str> = staff
                .role()
                .permissions()
                .iter()
                .map(|permission| permission.display_name())
                .collect();
            if permissions.is_empty() {
                println!("Permissions: none");
            } else {
                println!("Permissions: {}", permissions.join(", "));
            }
            Ok(())
        }
        LoginOutcome::Failure => bail!("Login failed: {}", Notice::AuthenticationRejected.message()),
        LoginOutcome::Cancelled => Err(LoginCancelled.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_script_submits_once_and_waits() {
        let script = headless_script("alice".to_string(), "pw1".to_string());
        assert_eq!(script.len(), 4);
        assert_eq!(script[2], ScriptStep::Input(PromptInput::Submit));
        assert_eq!(script[3], ScriptStep::Settle);
    }

    #[test]
    fn test_cancelled_error_downcasts() {
        let err: anyhow::Error = LoginCancelled.into();
        assert!(err.downcast_ref::<LoginCancelled>().is_some());
    }
}
