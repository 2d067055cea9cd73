//! Download-and-install workflow.

use super::metadata::{package_file_name, parse_metadata};
use super::{RunStatus, Updater};
use crate::config::UpdaterConfig;
use crate::constants::{ACTION_RELOAD, CHANNEL_TITLE};
use crate::core::UpdaterError;
use crate::utils::fs::write_file;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

impl Updater {
    /// Download, install and clean up the package of every configured endpoint.
    pub async fn check_for_updates(&self) -> Result<RunStatus> {
        let Some(_slot) = self.guard.try_acquire().await? else {
            return Ok(self.log_skipped());
        };

        let config = self.host.settings.load().await?;
        if config.api_urls.is_empty() {
            let message = UpdaterError::NoApiUrls.to_string();
            self.host.notifier.show_warning(&format!("{CHANNEL_TITLE}: {message}")).await;
            self.logger.error(message);
            return Ok(RunStatus::NotConfigured);
        }

        self.host.notifier.begin_progress(&format!("{CHANNEL_TITLE}: Checking for updates..."));
        self.logger.info(format!(
            "Checking for updates with the following API Urls: {}",
            config.api_urls.join(", ")
        ));

        for url in &config.api_urls {
            if let Err(e) = self.install_from_url(url, &config).await {
                self.logger.error(format!(
                    "Something went wrong during the fetch/installation logic - {e:#}"
                ));
            }
        }

        self.host.notifier.end_progress();
        Ok(RunStatus::Completed)
    }

    /// Install the package published at one endpoint.
    ///
    /// Non-success statuses are reported and end the attempt without an
    /// error. Once the package has been written, the file is deleted again
    /// whatever the install command does.
    pub(crate) async fn install_from_url(&self, url: &str, config: &UpdaterConfig) -> Result<()> {
        let response = self.host.http.get(url).await?;
        if !response.is_success() {
            self.logger.warning(
                UpdaterError::MetadataStatus {
                    url: url.to_string(),
                    status: response.status,
                }
                .to_string(),
            );
            return Ok(());
        }

        let metadata = parse_metadata(url, &response.body)?;
        let name = metadata.descriptor.name.as_str();
        let download = metadata.download_url()?;

        self.logger.info(format!("Installing latest version of {name}"));
        self.logger.info(format!("URL {download}"));

        let package = self.host.http.get(download).await?;
        if !package.is_success() {
            let message = format!(
                "{CHANNEL_TITLE}: {}",
                UpdaterError::PackageStatus {
                    name: name.to_string(),
                    status: package.status,
                }
            );
            self.host.notifier.show_error(&message).await;
            self.logger.error(message);
            return Ok(());
        }

        let file_name = package_file_name(name)?;
        let path = self.write_package(config, &file_name, &package.body).await?;

        self.install_package(name, &path).await;

        if let Err(e) = self.host.fs.delete(&path).await {
            self.logger.warning(format!("Failed to delete {} - {e:#}", path.display()));
        }
        Ok(())
    }

    /// Write to the storage directory, falling back to the first workspace folder.
    async fn write_package(&self, config: &UpdaterConfig, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let fs = self.host.fs.as_ref();
        let primary = config.storage_dir()?.join(file_name);

        match write_file(fs, &primary, bytes).await {
            Ok(path) => Ok(path),
            Err(e) => {
                debug!("Write to {} failed: {:#}", primary.display(), e);
                self.logger.warning("Failed to write in extension storage, trying workspace folder...");
                let folder = config.first_workspace_folder().ok_or(UpdaterError::NoWritableLocation)?;
                write_file(fs, &folder.join(file_name), bytes).await
            }
        }
    }

    /// Run the editor install command and offer a reload.
    ///
    /// An install failure is reported but does not fail the endpoint.
    async fn install_package(&self, name: &str, path: &Path) {
        if let Err(e) = self.host.editor.install_extension_from_file(path).await {
            let message = format!("{CHANNEL_TITLE}: Failed to install {name} - {e:#}");
            self.host.notifier.show_error(&message).await;
            self.logger.error(message);
            return;
        }

        let message = format!("Great news! {name} got installed.");
        self.logger.info(&message);
        let choice = self
            .host
            .notifier
            .show_info(&format!("{CHANNEL_TITLE}: {message}"), &[ACTION_RELOAD])
            .await;

        if choice.as_deref() == Some(ACTION_RELOAD) {
            if let Err(e) = self.host.editor.reload_window().await {
                self.logger.warning(format!("Failed to reload window - {e:#}"));
            }
        }
    }
}
