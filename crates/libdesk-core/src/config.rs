//! Configuration management for libdesk.
//!
//! Loads configuration from ${LIBDESK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Presentation used by the login prompt.
///
/// Both layouts drive the same prompt behavior; only the drawing differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromptLayout {
    /// Bordered form.
    #[default]
    Plain,
    /// Centered card over a shaded backdrop.
    Card,
}

impl PromptLayout {
    /// Returns the config/CLI name for this layout.
    pub fn display_name(&self) -> &'static str {
        match self {
            PromptLayout::Plain => "plain",
            PromptLayout::Card => "card",
        }
    }

    /// Returns the other layout.
    pub fn toggled(self) -> Self {
        match self {
            PromptLayout::Plain => PromptLayout::Card,
            PromptLayout::Card => PromptLayout::Plain,
        }
    }
}

impl std::str::FromStr for PromptLayout {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(PromptLayout::Plain),
            "card" => Ok(PromptLayout::Card),
            other => anyhow::bail!("Unknown layout '{other}' (expected 'plain' or 'card')"),
        }
    }
}

fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for libdesk configuration and data files.
    //!
    //! LIBDESK_HOME resolution order:
    //! 1. LIBDESK_HOME environment variable (if set)
    //! 2. ~/.config/libdesk (default)

    use std::path::PathBuf;

    /// Returns the libdesk home directory.
    pub fn libdesk_home() -> PathBuf {
        if let Ok(home) = std::env::var("LIBDESK_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("libdesk")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        libdesk_home().join("config.toml")
    }

    /// Returns the default path of the staff directory.
    pub fn staff_path() -> PathBuf {
        libdesk_home().join("staff.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        libdesk_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Login prompt presentation
    pub layout: PromptLayout,

    /// Optional override for the staff directory location
    pub staff_file: Option<String>,

    /// Consecutive failures before an account locks (0 disables)
    pub lockout_threshold: u32,

    /// Credential check timeout in seconds (0 disables)
    pub auth_timeout_secs: u32,

    /// Rejected attempts before the prompt fails (0 = unlimited)
    pub max_attempts: u32,

    /// Log filter when LIBDESK_LOG is unset
    pub log_level: String,
}

impl Config {
    const DEFAULT_LOCKOUT_THRESHOLD: u32 = 5;
    const DEFAULT_AUTH_TIMEOUT_SECS: u32 = 30;
    const DEFAULT_LOG_LEVEL: &str = "info";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Saves only the layout field to the config file.
    pub fn save_layout(layout: PromptLayout) -> Result<()> {
        Self::save_layout_to(&paths::config_path(), layout)
    }

    /// Saves only the layout field to a specific config file path.
    ///
    /// Creates the file from the default template if it doesn't exist.
    /// Other keys and comments are preserved.
    pub fn save_layout_to(path: &Path, layout: PromptLayout) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["layout"] = value(layout.display_name());

        Self::write_config(path, &doc.to_string())
    }

    /// Returns the staff directory path, honoring `staff_file` if set.
    pub fn staff_path(&self) -> PathBuf {
        match self.staff_file.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => paths::staff_path(),
        }
    }

    pub fn auth_timeout(&self) -> Option<Duration> {
        if self.auth_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.auth_timeout_secs)))
        }
    }

    /// Returns the attempt limit, or `None` when attempts are unlimited.
    pub fn attempt_limit(&self) -> Option<u32> {
        (self.max_attempts > 0).then_some(self.max_attempts)
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: PromptLayout::default(),
            staff_file: None,
            lockout_threshold: Self::DEFAULT_LOCKOUT_THRESHOLD,
            auth_timeout_secs: Self::DEFAULT_AUTH_TIMEOUT_SECS,
            max_attempts: 0,
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.layout, PromptLayout::Plain);
        assert_eq!(config.lockout_threshold, 5);
        assert_eq!(config.attempt_limit(), None);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "layout = \"card\"\nmax_attempts = 3\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.layout, PromptLayout::Card);
        assert_eq!(config.attempt_limit(), Some(3));
        assert_eq!(config.auth_timeout_secs, 30);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_rejects_unknown_layout() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "layout = \"fancy\"\n").unwrap();

        assert!(Config::load_from(&config_path).is_err());
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("layout = \"plain\""));
        assert!(contents.contains("# staff_file ="));

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.lockout_threshold, 5);
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        let result = Config::init(&config_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_save_layout_preserves_other_keys() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(
            &config_path,
            "# my settings\nlockout_threshold = 2\nlayout = \"plain\"\n",
        )
        .unwrap();

        Config::save_layout_to(&config_path, PromptLayout::Card).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# my settings"));
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.layout, PromptLayout::Card);
        assert_eq!(config.lockout_threshold, 2);
    }

    #[test]
    fn test_save_layout_creates_file_from_template() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("config.toml");

        Config::save_layout_to(&config_path, PromptLayout::Card).unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.layout, PromptLayout::Card);
        assert_eq!(config.auth_timeout_secs, 30);
    }

    #[test]
    fn test_auth_timeout_zero_disables() {
        let config = Config {
            auth_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.auth_timeout(), None);
    }

    #[test]
    fn test_staff_path_override() {
        let config = Config {
            staff_file: Some("/tmp/custom-staff.toml".to_string()),
            ..Default::default()
        };
        assert_eq!(config.staff_path(), PathBuf::from("/tmp/custom-staff.toml"));

        let blank = Config {
            staff_file: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.staff_path(), paths::staff_path());
    }

    #[test]
    fn test_layout_parse_and_toggle() {
        assert_eq!("Card".parse::<PromptLayout>().unwrap(), PromptLayout::Card);
        assert_eq!(" plain ".parse::<PromptLayout>().unwrap(), PromptLayout::Plain);
        assert!("glass".parse::<PromptLayout>().is_err());
        assert_eq!(PromptLayout::Plain.toggled(), PromptLayout::Card);
        assert_eq!(PromptLayout::Card.toggled(), PromptLayout::Plain);
    }
}
