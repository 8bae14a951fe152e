//! Effect handlers.
//!
//! Handlers are plain async functions that return the event payload. The
//! runtime spawns them and forwards the result to the inbox; handlers never
//! touch `PromptState`.

use std::sync::Arc;
use std::time::Duration;

use libdesk_core::auth::{AuthService, Credentials};
use tokio_util::sync::CancellationToken;

use crate::events::LoginCheck;

/// Runs one credential check against `auth`.
///
/// Cancellation wins over a result that is ready at the same time, and a
/// check cancelled before its first poll never reaches the service.
pub async fn login_check(
    auth: Arc<dyn AuthService>,
    credentials: Credentials,
    timeout: Option<Duration>,
    cancel: CancellationToken,
) -> LoginCheck {
    tokio::select! {
        biased;
        () = cancel.cancelled() => LoginCheck::Cancelled,
        check = with_timeout(verify(auth.as_ref(), &credentials), timeout) => check,
    }
}

async fn with_timeout(
    check: impl Future<Output = LoginCheck>,
    timeout: Option<Duration>,
) -> LoginCheck {
    let Some(limit) = timeout else {
        return check.await;
    };
    match tokio::time::timeout(limit, check).await {
        Ok(check) => check,
        Err(_) => LoginCheck::Unavailable(format!("timed out after {}s", limit.as_secs())),
    }
}

async fn verify(auth: &dyn AuthService, credentials: &Credentials) -> LoginCheck {
    match auth
        .login(credentials.username(), credentials.password())
        .await
    {
        Ok(false) => LoginCheck::Rejected,
        Ok(true) => match auth.current_staff().await {
            Ok(Some(staff)) => LoginCheck::Accepted(staff),
            Ok(None) => LoginCheck::Unavailable("no session after login".to_string()),
            Err(e) => LoginCheck::Unavailable(format!("{e:#}")),
        },
        Err(e) => LoginCheck::Unavailable(format!("{e:#}")),
    }
}
