//! Staff account command handlers.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use libdesk_core::auth::{NewStaff, RoleName, StaffDirectory, StaffRecord};
use libdesk_core::config::Config;
use serde::Serialize;

/// Account fields safe to print (no password hash).
#[derive(Debug, Serialize)]
struct StaffSummary<'a> {
    id: u32,
    username: &'a str,
    full_name: &'a str,
    role_id: u32,
    role: String,
    locked: bool,
    failed_attempts: u32,
    last_login: Option<DateTime<Utc>>,
}

impl<'a> From<&'a StaffRecord> for StaffSummary<'a> {
    fn from(record: &'a StaffRecord) -> Self {
        Self {
            id: record.id,
            username: &record.username,
            full_name: &record.full_name,
            role_id: record.role_id,
            role: RoleName::from_id(record.role_id).to_string(),
            locked: record.locked,
            failed_attempts: record.failed_attempts,
            last_login: record.last_login,
        }
    }
}

pub fn add(
    config: &Config,
    username: &str,
    full_name: &str,
    role_id: u32,
    password_stdin: bool,
) -> Result<()> {
    let path = config.staff_path();
    let mut directory = StaffDirectory::load(&path)?;
    let password = super::read_password(password_stdin, "Password: ")?;

    let record = directory.add(&NewStaff {
        username,
        full_name,
        role_id,
        password: &password,
    })?;
    let (id, username, role) = (
        record.id,
        record.username.clone(),
        RoleName::from_id(record.role_id),
    );
    directory
        .save(&path)
        .with_context(|| format!("save staff directory {}", path.display()))?;

    println!("Added {username} (id {id}, {role})");
    Ok(())
}

pub fn list(config: &Config, json: bool) -> Result<()> {
    let path = config.staff_path();
    let directory = StaffDirectory::load(&path)?;
    let summaries: Vec<StaffSummary<'_>> =
        directory.records().iter().map(StaffSummary::from).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No staff accounts in {}", path.display());
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "ID",
            "Username",
            "Full name",
            "Role",
            "Status",
            "Failed",
            "Last login",
        ]);
    for summary in &summaries {
        table.add_row(vec![
            summary.id.to_string(),
            summary.username.to_string(),
            summary.full_name.to_string(),
            summary.role.clone(),
            if summary.locked { "locked" } else { "active" }.to_string(),
            summary.failed_attempts.to_string(),
            summary.last_login.map_or_else(
                || "never".to_string(),
                |at| at.format("%Y-%m-%d %H:%M UTC").to_string(),
            ),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn unlock(config: &Config, username: &str) -> Result<()> {
    let path = config.staff_path();
    let mut directory = StaffDirectory::load(&path)?;
    directory.unlock(username)?;
    directory
        .save(&path)
        .with_context(|| format!("save staff directory {}", path.display()))?;
    println!("Unlocked {}", username.trim());
    Ok(())
}

pub fn passwd(config: &Config, username: &str, password_stdin: bool) -> Result<()> {
    let path = config.staff_path();
    let mut directory = StaffDirectory::load(&path)?;
    if directory.find(username).is_none() {
        anyhow::bail!("Unknown staff member '{}'", username.trim());
    }
    let password = super::read_password(password_stdin, "New password: ")?;
    directory.set_password(username, &password)?;
    directory
        .save(&path)
        .with_context(|| format!("save staff directory {}", path.display()))?;
    println!("Password updated for {}", username.trim());
    Ok(())
}
