//! Configuration source backed by the TOML config file.

use super::SettingsSource;
use crate::config::UpdaterConfig;
use crate::constants::DOWNLOADS_DIR_NAME;
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// [`SettingsSource`] that re-reads the config file on every call.
///
/// Unset locations are filled in relative to the config file: downloads go
/// to `downloads/` beside it, and the default workspace folder (the CLI's
/// current directory) is used when no workspace folders are listed.
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
    default_workspace: Option<PathBuf>,
}

impl FileSettings {
    /// Read settings from `path`; a missing file yields defaults.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            default_workspace: None,
        }
    }

    /// Workspace folder used when the file lists none.
    #[must_use]
    pub fn with_default_workspace(mut self, folder: Option<PathBuf>) -> Self {
        self.default_workspace = folder;
        self
    }

    /// Config file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsSource for FileSettings {
    async fn load(&self) -> Result<UpdaterConfig> {
        let mut config = UpdaterConfig::load_or_default(&self.path).await?;
        if config.storage_dir.is_none() {
            if let Some(parent) = self.path.parent() {
                config.storage_dir = Some(parent.join(DOWNLOADS_DIR_NAME));
            }
        }
        if config.workspace_folders.is_empty() {
            config.workspace_folders.extend(self.default_workspace.clone());
        }
        Ok(config)
    }
}
