//! Directory-backed `AuthService`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::{AuthService, AuthenticatedStaff, StaffDirectory};
use crate::config::Config;

/// Verifies staff credentials against a `StaffDirectory` file.
///
/// Every login re-reads the file so edits made by `libdesk staff` are picked
/// up without restarting. Failed attempts and lockouts are written back.
///
/// Checks on one service never overlap: each holds `directory_lock` until its
/// blocking job has finished with the file, even if the caller gave up.
#[derive(Debug)]
pub struct StaffAuthService {
    path: PathBuf,
    lockout_threshold: u32,
    directory_lock: Arc<Mutex<()>>,
    session: Mutex<Option<AuthenticatedStaff>>,
}

impl StaffAuthService {
    pub fn new(path: impl Into<PathBuf>, lockout_threshold: u32) -> Self {
        Self {
            path: path.into(),
            lockout_threshold,
            directory_lock: Arc::new(Mutex::new(())),
            session: Mutex::new(None),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.staff_path(), config.lockout_threshold)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuthService for StaffAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<bool> {
        let path = self.path.clone();
        let threshold = self.lockout_threshold;
        let username = username.to_string();
        let password = password.to_string();

        // Cancelled when this future is dropped before the check returns.
        let abandoned = CancellationToken::new();
        let on_drop = abandoned.clone().drop_guard();

        let guard = Arc::clone(&self.directory_lock).lock_owned().await;
        let staff = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            check_credentials(&path, threshold, &username, &password, &abandoned)
        })
        .await
        .context("credential check task failed")??;
        on_drop.disarm();

        let accepted = staff.is_some();
        *self.session.lock().await = staff;
        Ok(accepted)
    }

    async fn current_staff(&self) -> Result<Option<AuthenticatedStaff>> {
        Ok(self.session.lock().await.clone())
    }
}

/// Runs one credential check against the directory file.
///
/// Returns the staff member on success. Unknown users, locked accounts and
/// wrong passwords all yield `None`. Failures always count toward the lockout;
/// a correct password is not recorded once `abandoned` is cancelled.
fn check_credentials(
    path: &Path,
    lockout_threshold: u32,
    username: &str,
    password: &str,
    abandoned: &CancellationToken,
) -> Result<Option<AuthenticatedStaff>> {
    let mut directory = StaffDirectory::load(path)?;

    let Some(record) = directory.find_mut(username) else {
        tracing::info!(username, "login rejected: unknown user");
        return Ok(None);
    };

    if record.locked {
        tracing::info!(username, "login rejected: account locked");
        return Ok(None);
    }

    if !record.verify_password(password)? {
        let locked_now = record.record_failure(lockout_threshold);
        let attempts = record.failed_attempts;
        if locked_now {
            tracing::warn!(username, attempts, "account locked after repeated failures");
        } else {
            tracing::info!(username, attempts, "login rejected: wrong password");
        }
        directory.save(path)?;
        return Ok(None);
    }

    if abandoned.is_cancelled() {
        tracing::info!(username, "login abandoned before it was recorded");
        return Ok(None);
    }

    record.record_success(Utc::now());
    let staff = record.to_authenticated();
    directory.save(path)?;
    tracing::info!(username, staff_id = staff.id, "login accepted");
    Ok(Some(staff))
}
