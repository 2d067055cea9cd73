//! One-shot update checks.

use super::CliConfig;
use crate::updater::RunStatus;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::debug;

/// Download and install the package of every configured endpoint.
///
/// Each endpoint is handled in order; a failing endpoint is logged to the
/// output-channel log and the next one is still tried. After a successful
/// install a "Reload window" prompt is shown.
///
/// ```bash
/// vsix-updater check
/// vsix-updater --yes check     # also accept the reload prompt
/// ```
#[derive(Args, Debug, Default)]
pub struct CheckCommand {}

impl CheckCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let updater = config.build_updater().await?;
        let status = updater.check_for_updates().await?;
        debug!("check finished: {:?}", status);
        report(status);
        Ok(())
    }
}

/// Compare published and installed versions, prompting before any install.
///
/// Versions that differ trigger an "Update" / "Ignore" prompt. Nothing is
/// installed unless "Update" is picked, and an "Ignore" answer is remembered
/// until the installed version changes.
#[derive(Args, Debug, Default)]
pub struct BackgroundCheckCommand {}

impl BackgroundCheckCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let updater = config.build_updater().await?;
        let status = updater.background_check().await?;
        debug!("background check finished: {:?}", status);
        report(status);
        Ok(())
    }
}

fn report(status: RunStatus) {
    match status {
        RunStatus::Skipped => eprintln!("{}", "Update check already in progress, skipping".yellow()),
        RunStatus::Completed | RunStatus::NotConfigured => {}
    }
}
