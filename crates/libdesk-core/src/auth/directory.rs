//! TOML-backed staff directory.
//!
//! Stored at `${LIBDESK_HOME}/staff.toml` as an array of `[[staff]]` tables.
//! Passwords are kept as argon2 PHC strings only.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use argon2::Argon2;
use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use chrono::{DateTime, Utc};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use super::AuthenticatedStaff;

/// One staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRecord {
    pub id: u32,
    pub username: String,
    pub full_name: String,
    pub role_id: u32,
    pub password_hash: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub failed_attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

/// Input for creating a staff account.
#[derive(Debug, Clone)]
pub struct NewStaff<'a> {
    pub username: &'a str,
    pub full_name: &'a str,
    pub role_id: u32,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffDirectory {
    #[serde(default)]
    staff: Vec<StaffRecord>,
}

impl StaffRecord {
    /// Checks `candidate` against the stored hash.
    ///
    /// A mismatch is `Ok(false)`; a malformed stored hash is an error.
    pub fn verify_password(&self, candidate: &str) -> Result<bool> {
        verify_secret(&self.password_hash, candidate)
            .with_context(|| format!("verify password for '{}'", self.username))
    }

    /// Counts a failed attempt, locking the account once `threshold` is reached.
    ///
    /// A threshold of 0 never locks. Returns true if this call locked the account.
    pub fn record_failure(&mut self, threshold: u32) -> bool {
        self.failed_attempts = self.failed_attempts.saturating_add(1);
        if threshold > 0 && !self.locked && self.failed_attempts >= threshold {
            self.locked = true;
            return true;
        }
        false
    }

    pub fn record_success(&mut self, at: DateTime<Utc>) {
        self.failed_attempts = 0;
        self.last_login = Some(at);
    }

    pub fn to_authenticated(&self) -> AuthenticatedStaff {
        AuthenticatedStaff {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            role_id: self.role_id,
        }
    }
}

impl StaffDirectory {
    /// Loads the directory from `path`.
    /// Returns an empty directory if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read staff directory {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse staff directory {}", path.display()))
    }

    /// Writes the directory to `path` (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let content = toml::to_string(self).context("Failed to serialize staff directory")?;
        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        tracing::debug!(path = %path.display(), records = self.staff.len(), "staff directory saved");
        Ok(())
    }

    pub fn records(&self) -> &[StaffRecord] {
        &self.staff
    }

    pub fn is_empty(&self) -> bool {
        self.staff.is_empty()
    }

    pub fn find(&self, username: &str) -> Option<&StaffRecord> {
        let username = username.trim();
        self.staff.iter().find(|record| record.username == username)
    }

    pub fn find_mut(&mut self, username: &str) -> Option<&mut StaffRecord> {
        let username = username.trim();
        self.staff
            .iter_mut()
            .find(|record| record.username == username)
    }

    /// Adds an account, assigning the next free id.
    pub fn add(&mut self, new: &NewStaff<'_>) -> Result<&StaffRecord> {
        let username = new.username.trim();
        let full_name = new.full_name.trim();
        let password = new.password.trim();

        if username.is_empty() {
            anyhow::bail!("Username cannot be empty");
        }
        if password.is_empty() {
            anyhow::bail!("Password cannot be empty");
        }
        if self.find(username).is_some() {
            anyhow::bail!("Staff member '{username}' already exists");
        }

        let id = self
            .staff
            .iter()
            .map(|record| record.id)
            .max()
            .map_or(1, |max| max.saturating_add(1));
        let record = StaffRecord {
            id,
            username: username.to_string(),
            full_name: if full_name.is_empty() {
                username.to_string()
            } else {
                full_name.to_string()
            },
            role_id: new.role_id,
            password_hash: hash_secret(password)?,
            locked: false,
            failed_attempts: 0,
            last_login: None,
        };
        self.staff.push(record);
        Ok(&self.staff[self.staff.len() - 1])
    }

    /// Clears the lock and failure counter for `username`.
    pub fn unlock(&mut self, username: &str) -> Result<()> {
        let record = self
            .find_mut(username)
            .with_context(|| format!("Unknown staff member '{}'", username.trim()))?;
        record.locked = false;
        record.failed_attempts = 0;
        Ok(())
    }

    /// Replaces the password for `username`.
    pub fn set_password(&mut self, username: &str, password: &str) -> Result<()> {
        let password = password.trim();
        if password.is_empty() {
            anyhow::bail!("Password cannot be empty");
        }
        let hash = hash_secret(password)?;
        let record = self
            .find_mut(username)
            .with_context(|| format!("Unknown staff member '{}'", username.trim()))?;
        record.password_hash = hash;
        Ok(())
    }
}

fn hash_secret(input: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(input.as_bytes(), &salt)
        .map_err(|err| anyhow!("Failed to hash password: {err}"))?;
    Ok(hash.to_string())
}

fn verify_secret(expected_hash: &str, candidate: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(expected_hash).map_err(|err| anyhow!("invalid stored hash: {err}"))?;
    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(err) => Err(anyhow!("password verification failed: {err}")),
    }
}
