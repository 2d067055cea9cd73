//! Silent (background) update check.

use super::ignore::{IgnoreStore, ignore_key};
use super::metadata::{is_up_to_date, parse_metadata};
use super::{RunStatus, Updater};
use crate::config::UpdaterConfig;
use crate::constants::{ACTION_IGNORE, ACTION_UPDATE, CHANNEL_TITLE};
use crate::core::UpdaterError;
use anyhow::Result;
use chrono::Utc;
use tracing::debug;

impl Updater {
    /// Check every configured endpoint and prompt for differing versions.
    ///
    /// Nothing is installed unless the user picks "Update". An empty
    /// endpoint list is not an error here; the check simply has nothing to do.
    pub async fn background_check(&self) -> Result<RunStatus> {
        let Some(_slot) = self.guard.try_acquire().await? else {
            return Ok(self.log_skipped());
        };

        let config = self.host.settings.load().await?;
        if config.api_urls.is_empty() {
            debug!("No API Urls configured, background check has nothing to do");
            return Ok(RunStatus::NotConfigured);
        }

        let ignores = IgnoreStore::new(self.host.state.as_ref(), config.ignore_ttl_days);
        if let Err(e) = ignores.prune(Utc::now()).await {
            self.logger.warning(format!("Failed to prune ignore flags - {e:#}"));
        }

        for url in &config.api_urls {
            if let Err(e) = self.check_url(url, &config).await {
                self.logger.error(format!("Background check failed for {url} - {e:#}"));
            }
        }

        Ok(RunStatus::Completed)
    }

    async fn check_url(&self, url: &str, config: &UpdaterConfig) -> Result<()> {
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
        let descriptor = &metadata.descriptor;

        let installed = self.host.editor.installed_extensions().await?;
        let installed_version = installed
            .iter()
            .find(|ext| ext.id.eq_ignore_ascii_case(&descriptor.id))
            .map(|ext| ext.version.as_str());

        if is_up_to_date(installed_version, &descriptor.version, config.version_policy) {
            self.logger.info(format!("{} is up to date", descriptor.label()));
            return Ok(());
        }

        let key = ignore_key(&descriptor.id, installed_version);
        let ignores = IgnoreStore::new(self.host.state.as_ref(), config.ignore_ttl_days);
        if ignores.is_ignored(&key, Utc::now()).await? {
            debug!("Update for {} is ignored ({})", descriptor.id, key);
            return Ok(());
        }

        let message = format!("A newer version of the {} extension is available.", descriptor.label());
        let choice = self.host.notifier.show_info(&message, &[ACTION_UPDATE, ACTION_IGNORE]).await;

        match choice.as_deref() {
            Some(ACTION_UPDATE) => {
                self.host.notifier.begin_progress(&format!("{CHANNEL_TITLE}: Installing {}...", descriptor.label()));
                let outcome = self.install_from_url(url, config).await;
                self.host.notifier.end_progress();
                outcome?;
            }
            Some(ACTION_IGNORE) => {
                ignores.ignore(&key, Utc::now()).await?;
                self.logger.info(format!(
                    "Ignoring version {} of {} until the installed version changes",
                    descriptor.version,
                    descriptor.label()
                ));
            }
            _ => debug!("Update prompt for {} dismissed", descriptor.id),
        }

        Ok(())
    }
}
