//! Updater configuration file.
//!
//! The configuration lives in a single TOML file:
//!
//! - Unix/macOS: `~/.vsix-updater/config.toml`
//! - Windows: `%LOCALAPPDATA%\vsix-updater\config.toml`
//!
//! The location can be overridden with `--config` or the
//! `VSIX_UPDATER_CONFIG` environment variable. The file is read fresh on
//! every invocation of a check so edits take effect without a restart.
//!
//! ```toml
//! api_urls = [
//!     "https://updates.example.com/api/my-extension/latest",
//! ]
//! editor_command = "code"
//! version_policy = "exact"
//! ignore_ttl_days = 30
//!
//! [schedule]
//! check_on_start = false
//! ```

use crate::constants::{
    APP_DIR_NAME, CHECK_LOCK_FILE_NAME, CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_EDITOR_COMMAND,
    DEFAULT_IGNORE_TTL_DAYS, DOWNLOADS_DIR_NAME, LOG_FILE_NAME, STATE_FILE_NAME,
    WINDOWS_APP_DIR_NAME,
};
use crate::core::UpdaterError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// How a fetched version is compared with the installed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionPolicy {
    /// Offer an update whenever the version strings differ. A remote version
    /// that is older than the installed one is offered too.
    #[default]
    Exact,
    /// Offer an update only when the remote version is strictly newer by
    /// semver ordering. Installed versions that are not valid semver fall
    /// back to [`VersionPolicy::Exact`].
    Newer,
}

/// Background scheduler settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Run one silent check as soon as the scheduler starts.
    #[serde(default)]
    pub check_on_start: bool,
}

/// Effective updater configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Metadata endpoints, processed in order.
    #[serde(default)]
    pub api_urls: Vec<String>,

    /// Primary download directory. Defaults to `<app dir>/downloads`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,

    /// Fallback roots tried when the storage directory is not writable.
    /// Only the first entry is used. The CLI fills in the current directory
    /// when the list is empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workspace_folders: Vec<PathBuf>,

    /// Editor launcher used to list and install extensions.
    #[serde(default = "default_editor_command")]
    pub editor_command: String,

    /// Version comparison rule.
    #[serde(default)]
    pub version_policy: VersionPolicy,

    /// Days an ignore flag is honoured. `0` keeps flags forever.
    #[serde(default = "default_ignore_ttl_days")]
    pub ignore_ttl_days: u64,

    /// Per-request timeout. Unset means requests may wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Output-channel log file. Defaults to `<app dir>/updater.log`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Background scheduler settings.
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

fn default_editor_command() -> String {
    DEFAULT_EDITOR_COMMAND.to_string()
}

const fn default_ignore_ttl_days() -> u64 {
    DEFAULT_IGNORE_TTL_DAYS
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            api_urls: Vec::new(),
            storage_dir: None,
            workspace_folders: Vec::new(),
            editor_command: default_editor_command(),
            version_policy: VersionPolicy::default(),
            ignore_ttl_days: default_ignore_ttl_days(),
            request_timeout_secs: None,
            log_file: None,
            schedule: ScheduleConfig::default(),
        }
    }
}

impl UpdaterConfig {
    /// Load from `path`, or defaults when the file does not exist.
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load from an existing file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .map_err(UpdaterError::from)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Ok(config)
    }

    /// Write the configuration, creating the parent directory.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Resolve the config file path: explicit override, env var, then default.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }
        Ok(app_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Download directory, falling back to `<app dir>/downloads`.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(app_dir()?.join(DOWNLOADS_DIR_NAME)),
        }
    }

    /// First fallback root, if any.
    #[must_use]
    pub fn first_workspace_folder(&self) -> Option<PathBuf> {
        self.workspace_folders.first().cloned()
    }

    /// Output-channel log file location.
    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(app_dir()?.join(LOG_FILE_NAME)),
        }
    }

    /// Example configuration written by `config init`.
    #[must_use]
    pub fn init_example() -> Self {
        Self {
            api_urls: vec!["https://updates.example.com/api/my-extension/latest".to_string()],
            ..Self::default()
        }
    }
}

/// Per-user application directory.
pub fn app_dir() -> Result<PathBuf> {
    let dir = if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
            .join(WINDOWS_APP_DIR_NAME)
    } else {
        dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
            .join(APP_DIR_NAME)
    };
    Ok(dir)
}

/// State file living next to the given config file.
#[must_use]
pub fn state_path_for(config_path: &Path) -> PathBuf {
    sibling_of(config_path, STATE_FILE_NAME)
}

/// Check lock file living next to the given config file.
#[must_use]
pub fn check_lock_path_for(config_path: &Path) -> PathBuf {
    sibling_of(config_path, CHECK_LOCK_FILE_NAME)
}

fn sibling_of(config_path: &Path, name: &str) -> PathBuf {
    config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(APP_DIR_NAME))
        .join(name)
}
