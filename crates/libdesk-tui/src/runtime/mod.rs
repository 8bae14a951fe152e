//! Login prompt runtime: runs the event loop and executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! Credential checks run as tokio tasks and send their result to `inbox_tx`.
//! The loop drains `inbox_rx` every frame, so the caller's thread never waits
//! on the auth service and `Esc` stays responsive while a check is running.
//!
//! Structure:
//! - `mod.rs`: `LoginPrompt` (event loop, effect dispatch)
//! - `inbox.rs`: inbox channel types
//! - `handlers.rs`: async effect handlers

mod handlers;
mod inbox;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use inbox::{UiEventReceiver, UiEventSender};
use libdesk_core::auth::{AuthService, LoginOutcome};
use libdesk_core::config::{Config, PromptLayout, paths};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskCompleted, TaskId, TaskStarted};
use crate::effects::UiEffect;
use crate::events::{LoginCheck, UiEvent};
use crate::frontend::PromptFrontend;
use crate::host::LoginListener;
use crate::prompt::{self, PromptState};

/// Poll interval while a check is outstanding (drives the spinner).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll interval when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Modal staff login.
///
/// Owns the prompt state and the inbox. `run` blocks the calling thread until
/// the prompt closes; credential checks are spawned on the tokio runtime that
/// was current when the prompt was built.
pub struct LoginPrompt {
    state: PromptState,
    auth: Arc<dyn AuthService>,
    listener: Option<Box<dyn LoginListener>>,
    handle: Handle,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    auth_timeout: Option<Duration>,
    /// Where F2 layout changes are saved; `None` keeps them in memory.
    layout_config: Option<PathBuf>,
    last_tick: Instant,
}

impl LoginPrompt {
    /// Creates a prompt with no timeout, no attempt limit and no listener.
    ///
    /// # Errors
    /// Returns an error when called outside a tokio runtime.
    pub fn new(auth: Arc<dyn AuthService>, layout: PromptLayout) -> Result<Self> {
        let handle =
            Handle::try_current().context("login prompt must be created inside a tokio runtime")?;
        let (inbox_tx, inbox_rx) = inbox::channel();

        Ok(Self {
            state: PromptState::new(layout),
            auth,
            listener: None,
            handle,
            inbox_tx,
            inbox_rx,
            auth_timeout: None,
            layout_config: None,
            last_tick: Instant::now(),
        })
    }

    /// Creates a prompt configured from `config`. Layout changes are saved to
    /// the default config file.
    ///
    /// # Errors
    /// Returns an error when called outside a tokio runtime.
    pub fn from_config(auth: Arc<dyn AuthService>, config: &Config) -> Result<Self> {
        Ok(Self::new(auth, config.layout)?
            .with_auth_timeout(config.auth_timeout())
            .with_attempt_limit(config.attempt_limit())
            .persist_layout_to(paths::config_path()))
    }

    #[must_use]
    pub fn with_listener(mut self, listener: impl LoginListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    #[must_use]
    pub fn with_username(mut self, username: &str) -> Self {
        self.state = self.state.with_username(username);
        self
    }

    /// Rejections allowed before the prompt closes with `Failure`.
    #[must_use]
    pub fn with_attempt_limit(mut self, limit: Option<u32>) -> Self {
        self.state = self.state.with_attempt_limit(limit);
        self
    }

    #[must_use]
    pub fn with_auth_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.auth_timeout = timeout;
        self
    }

    #[must_use]
    pub fn persist_layout_to(mut self, path: PathBuf) -> Self {
        self.layout_config = Some(path);
        self
    }

    pub fn state(&self) -> &PromptState {
        &self.state
    }

    /// Runs the prompt until it closes and returns its outcome.
    ///
    /// # Errors
    /// Returns an error if the prompt is already closed or the front-end fails.
    /// Authentication results are never errors.
    pub fn run<F>(&mut self, frontend: &mut F) -> Result<LoginOutcome>
    where
        F: PromptFrontend + ?Sized,
    {
        if self.state.is_closed() {
            bail!("login prompt is already closed");
        }
        tracing::debug!(layout = self.state.layout.display_name(), "login prompt opened");

        while self.state.is_open() {
            self.collect_inbox_events();
            if self.state.is_closed() {
                break;
            }

            if self.last_tick.elapsed() >= FRAME_DURATION {
                self.last_tick = Instant::now();
                self.dispatch_event(UiEvent::Tick);
            }

            frontend.render(&self.state)?;

            let poll = if self.state.is_checking() {
                FRAME_DURATION
            } else {
                IDLE_POLL_DURATION
            };
            if let Some(input) = frontend.next_input(&self.state, poll)? {
                self.dispatch_event(UiEvent::Input(input));
            }
        }

        // Last frame shows the closing notice (welcome, failure).
        frontend.render(&self.state)?;

        self.state
            .outcome()
            .cloned()
            .context("login prompt closed without an outcome")
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_inbox_events(&mut self) {
        while let Ok(event) = self.inbox_rx.try_recv() {
            self.dispatch_event(event);
        }
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = prompt::update(&mut self.state, event);
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns a credential check with a TaskStarted/LoginChecked lifecycle.
    ///
    /// `TaskStarted` is applied before the task is spawned so the reducer
    /// holds the token by the time any later input is processed.
    fn spawn_task<F, Fut>(&mut self, id: TaskId, f: F)
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = LoginCheck> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        self.dispatch_event(UiEvent::TaskStarted(TaskStarted {
            id,
            cancel: Some(cancel.clone()),
        }));

        let tx = self.inbox_tx.clone();
        self.handle.spawn(async move {
            let result = f(cancel).await;
            let _ = tx.send(UiEvent::LoginChecked(TaskCompleted { id, result }));
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::SpawnLoginCheck { task, credentials } => {
                let auth = Arc::clone(&self.auth);
                let timeout = self.auth_timeout;
                self.spawn_task(task, move |cancel| {
                    handlers::login_check(auth, credentials, timeout, cancel)
                });
            }
            UiEffect::NotifyHost => {
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_login_succeeded();
                }
            }
            UiEffect::PersistLayout { layout } => {
                let Some(path) = self.layout_config.as_deref() else {
                    return;
                };
                if let Err(e) = Config::save_layout_to(path, layout) {
                    tracing::warn!(error = %format!("{e:#}"), "failed to save layout");
                }
            }
            UiEffect::CancelTask { token } => {
                if let Some(token) = token {
                    token.cancel();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::anyhow;
    use async_trait::async_trait;
    use libdesk_core::auth::AuthenticatedStaff;
    use tempfile::TempDir;
    use tokio::sync::Notify;

    use super::*;
    use crate::frontend::{ScriptStep, ScriptedFrontend};
    use crate::prompt::{Field, Notice, PromptInput};

    /// Records every `login` call; answers `true` only for `alice`/`pw1`.
    #[derive(Default)]
    struct RecordingAuth {
        calls: Mutex<Vec<(String, String)>>,
        session: Mutex<Option<AuthenticatedStaff>>,
    }

    impl RecordingAuth {
        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AuthService for RecordingAuth {
        async fn login(&self, username: &str, password: &str) -> anyhow::Result<bool> {
            self.calls
                .lock()
                .unwrap()
                .push((username.to_string(), password.to_string()));
            let ok = username == "alice" && password == "pw1";
            *self.session.lock().unwrap() = ok.then(alice);
            Ok(ok)
        }

        async fn current_staff(&self) -> anyhow::Result<Option<AuthenticatedStaff>> {
            Ok(self.session.lock().unwrap().clone())
        }
    }

    /// `login` blocks until released; counts calls that got past the wait.
    #[derive(Default)]
    struct GatedAuth {
        entered: AtomicUsize,
        finished: AtomicUsize,
        release: Notify,
    }

    #[async_trait]
    impl AuthService for GatedAuth {
        async fn login(&self, _username: &str, _password: &str) -> anyhow::Result<bool> {
            self.entered.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }

        async fn current_staff(&self) -> anyhow::Result<Option<AuthenticatedStaff>> {
            Ok(Some(alice()))
        }
    }

    struct FailingAuth;

    #[async_trait]
    impl AuthService for FailingAuth {
        async fn login(&self, _username: &str, _password: &str) -> anyhow::Result<bool> {
            Err(anyhow!("staff store offline"))
        }

        async fn current_staff(&self) -> anyhow::Result<Option<AuthenticatedStaff>> {
            Ok(None)
        }
    }

    fn alice() -> AuthenticatedStaff {
        AuthenticatedStaff {
            id: 7,
            username: "alice".to_string(),
            full_name: "Alice Nguyen".to_string(),
            role_id: 2,
        }
    }

    fn test_runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap()
    }

    fn fill(username: &str, password: &str) -> Vec<ScriptStep> {
        vec![
            ScriptStep::Input(PromptInput::Fill {
                field: Field::Username,
                value: username.to_string(),
            }),
            ScriptStep::Input(PromptInput::Fill {
                field: Field::Password,
                value: password.to_string(),
            }),
        ]
    }

    fn submit_and_settle() -> Vec<ScriptStep> {
        vec![ScriptStep::Input(PromptInput::Submit), ScriptStep::Settle]
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        let auth: Arc<dyn AuthService> = Arc::new(RecordingAuth::default());
        assert!(LoginPrompt::new(auth, PromptLayout::Plain).is_err());
    }

    #[test]
    fn test_blank_input_never_calls_service() {
        let rt = test_runtime();
        let _guard = rt.enter();

        for (username, password) in [("", "pw1"), ("alice", ""), ("   ", "pw1"), ("alice", " \t ")]
        {
            let auth = Arc::new(RecordingAuth::default());
            let mut prompt = LoginPrompt::new(auth.clone(), PromptLayout::Plain).unwrap();
            let mut steps = fill(username, password);
            steps.push(ScriptStep::Input(PromptInput::Submit));
            let mut frontend = ScriptedFrontend::new(steps);

            let outcome = prompt.run(&mut frontend).unwrap();

            assert_eq!(outcome, LoginOutcome::Cancelled);
            assert!(auth.calls().is_empty());
            assert!(frontend.notices().contains(&Notice::MissingInput));
            assert!(frontend.exhausted_while_open());
        }
    }

    #[test]
    fn test_rejected_login_stays_open() {
        let rt = test_runtime();
        let _guard = rt.enter();
        let auth = Arc::new(RecordingAuth::default());
        let mut prompt = LoginPrompt::new(auth.clone(), PromptLayout::Plain).unwrap();

        let mut steps = fill("alice", "wrong");
        steps.extend(submit_and_settle());
        let mut frontend = ScriptedFrontend::new(steps);
        let outcome = prompt.run(&mut frontend).unwrap();

        assert!(frontend.exhausted_while_open());
        assert_ne!(outcome, LoginOutcome::Success(alice()));
        assert_eq!(auth.calls(), vec![("alice".to_string(), "wrong".to_string())]);
        assert!(frontend.notices().contains(&Notice::AuthenticationRejected));
    }

    #[test]
    fn test_attempt_limit_ends_in_failure() {
        let rt = test_runtime();
        let _guard = rt.enter();
        let auth = Arc::new(RecordingAuth::default());
        let mut prompt = LoginPrompt::new(auth.clone(), PromptLayout::Plain)
            .unwrap()
            .with_attempt_limit(Some(1));

        let mut steps = fill("bob", "pw1");
        steps.extend(submit_and_settle());
        let outcome = prompt.run(&mut ScriptedFrontend::new(steps)).unwrap();

        assert_eq!(outcome, LoginOutcome::Failure);
        assert_eq!(auth.calls().len(), 1);
    }

    #[test]
    fn test_success_scenario_notifies_host_once() {
        let rt = test_runtime();
        let _guard = rt.enter();
        let auth = Arc::new(RecordingAuth::default());
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notified);

        let mut prompt = LoginPrompt::new(auth.clone(), PromptLayout::Card)
            .unwrap()
            .with_listener(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        let mut steps = fill(" alice ", "pw1");
        steps.extend(submit_and_settle());
        let mut frontend = ScriptedFrontend::new(steps);
        let outcome = prompt.run(&mut frontend).unwrap();

        assert_eq!(outcome, LoginOutcome::Success(alice()));
        assert_eq!(auth.calls(), vec![("alice".to_string(), "pw1".to_string())]);
        assert_eq!(notified.load(Ordering::SeqCst), 1);

        let welcome = frontend
            .notices()
            .iter()
            .find_map(|notice| match notice {
                Notice::Welcome(text) => Some(text.clone()),
                _ => None,
            })
            .unwrap();
        assert!(welcome.contains("Alice Nguyen"));
        assert!(welcome.contains("Librarian"));

        // Closed prompts are inert.
        assert!(prompt.run(&mut ScriptedFrontend::new(Vec::new())).is_err());
        assert_eq!(notified.load(Ordering::SeqCst), 1);
        assert_eq!(prompt.state().outcome(), Some(&LoginOutcome::Success(alice())));
    }

    #[test]
    fn test_retry_after_rejection_succeeds() {
        let rt = test_runtime();
        let _guard = rt.enter();
        let auth = Arc::new(RecordingAuth::default());
        let mut prompt = LoginPrompt::new(auth.clone(), PromptLayout::Plain).unwrap();

        let mut steps = fill("alice", "nope");
        steps.extend(submit_and_settle());
        steps.extend(fill("alice", "pw1"));
        steps.extend(submit_and_settle());
        let outcome = prompt.run(&mut ScriptedFrontend::new(steps)).unwrap();

        assert_eq!(outcome, LoginOutcome::Success(alice()));
        assert_eq!(auth.calls().len(), 2);
    }

    #[test]
    fn test_cancel_before_submit_never_calls_service() {
        let rt = test_runtime();
        let _guard = rt.enter();
        let auth = Arc::new(RecordingAuth::default());
        let mut prompt = LoginPrompt::new(auth.clone(), PromptLayout::Plain).unwrap();

        let mut steps = fill("alice", "pw1");
        steps.push(ScriptStep::Input(PromptInput::Cancel));
        steps.push(ScriptStep::Input(PromptInput::Submit));
        let outcome = prompt.run(&mut ScriptedFrontend::new(steps)).unwrap();

        assert_eq!(outcome, LoginOutcome::Cancelled);
        assert!(auth.calls().is_empty());
    }

    #[test]
    fn test_cancel_while_checking_abandons_the_call() {
        let rt = test_runtime();
        let _guard = rt.enter();
        let auth = Arc::new(GatedAuth::default());
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notified);
        let mut prompt = LoginPrompt::new(auth.clone(), PromptLayout::Plain)
            .unwrap()
            .with_listener(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        let mut steps = fill("alice", "pw1");
        steps.push(ScriptStep::Input(PromptInput::Submit));
        steps.push(ScriptStep::Input(PromptInput::Cancel));
        let outcome = prompt.run(&mut ScriptedFrontend::new(steps)).unwrap();
        assert_eq!(outcome, LoginOutcome::Cancelled);

        // Releasing the gate after cancel must not complete a login.
        auth.release.notify_waiters();
        std::thread::sleep(Duration::from_millis(50));
        assert!(auth.entered.load(Ordering::SeqCst) <= 1);
        assert_eq!(auth.finished.load(Ordering::SeqCst), 0);
        assert_eq!(notified.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_service_error_shows_unavailable_and_stays_open() {
        let rt = test_runtime();
        let _guard = rt.enter();
        let mut prompt = LoginPrompt::new(Arc::new(FailingAuth), PromptLayout::Plain).unwrap();

        let mut steps = fill("alice", "pw1");
        steps.extend(submit_and_settle());
        let mut frontend = ScriptedFrontend::new(steps);
        prompt.run(&mut frontend).unwrap();

        assert!(frontend.exhausted_while_open());
        let unavailable = frontend
            .notices()
            .iter()
            .any(|notice| matches!(notice, Notice::ServiceUnavailable(detail) if detail.contains("staff store offline")));
        assert!(unavailable);
    }

    #[test]
    fn test_layout_toggle_is_persisted() {
        let rt = test_runtime();
        let _guard = rt.enter();
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        let mut prompt = LoginPrompt::new(Arc::new(RecordingAuth::default()), PromptLayout::Plain)
            .unwrap()
            .persist_layout_to(config_path.clone());

        let steps = vec![ScriptStep::Input(PromptInput::ToggleLayout)];
        prompt.run(&mut ScriptedFrontend::new(steps)).unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.layout, PromptLayout::Card);
    }
}
