//! Staff authentication.
//!
//! - `AuthService`: the credential check consumed by the login prompt
//! - `roles`: role labels and permissions
//! - `directory`: the TOML-backed staff directory
//! - `service`: `StaffAuthService`, the directory-backed `AuthService`

pub mod directory;
pub mod roles;
pub mod service;

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use directory::{NewStaff, StaffDirectory, StaffRecord};
pub use roles::{Permission, RoleName};
pub use service::StaffAuthService;

/// Username/password pair for a single submit attempt.
///
/// Both values are trimmed and non-empty once constructed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Builds credentials from raw field values.
    ///
    /// Returns `None` if either value is empty after trimming.
    pub fn from_input(username: &str, password: &str) -> Option<Self> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Staff member recorded as the current session after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedStaff {
    pub id: u32,
    pub username: String,
    pub full_name: String,
    pub role_id: u32,
}

impl AuthenticatedStaff {
    pub fn role(&self) -> RoleName {
        RoleName::from_id(self.role_id)
    }

    /// Returns the greeting shown after a successful login.
    pub fn welcome_message(&self) -> String {
        format!("Welcome, {}!\nRole: {}", self.full_name, self.role())
    }
}

/// Final result of one login prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success(AuthenticatedStaff),
    /// The attempt limit was reached without a successful login.
    Failure,
    Cancelled,
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success(_))
    }

    /// Returns the logged-in staff member, if any.
    pub fn staff(&self) -> Option<&AuthenticatedStaff> {
        match self {
            LoginOutcome::Success(staff) => Some(staff),
            LoginOutcome::Failure | LoginOutcome::Cancelled => None,
        }
    }
}

/// Credential check and session store.
///
/// `login` returns `Ok(false)` for wrong passwords, unknown users and locked
/// accounts alike. `Err` is reserved for the service itself failing (I/O,
/// corrupt store). A `true` result records the current session, readable via
/// `current_staff`.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<bool>;

    async fn current_staff(&self) -> Result<Option<AuthenticatedStaff>>;
}
