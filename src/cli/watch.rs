//! Long-running background checker.

use super::CliConfig;
use crate::host::SettingsSource;
use crate::updater::scheduler::{BackgroundScheduler, SchedulerOptions};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::sync::Arc;

/// Run the background check at the top of every hour until Ctrl-C.
///
/// Prompts are answered in this terminal. With `--yes`, every newer version
/// is installed without asking.
#[derive(Args, Debug, Default)]
pub struct WatchCommand {
    /// Check once immediately instead of waiting for the next hour.
    ///
    /// Overrides `schedule.check_on_start` in the configuration.
    #[arg(long)]
    now: bool,
}

impl WatchCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let settings = config.settings()?;
        let check_on_start = settings.load().await?.schedule.check_on_start;

        let updater = Arc::new(config.build_updater().await?);
        let options = SchedulerOptions {
            run_on_start: self.now || check_on_start,
        };

        let scheduler = BackgroundScheduler::start(Arc::clone(&updater), options);
        eprintln!(
            "{} Checking {} every hour. Press Ctrl-C to stop.",
            "▶".green(),
            settings.path().display()
        );

        let signal = tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C");
        if updater.is_busy() {
            eprintln!("{} Waiting for the running check to finish...", "⏳".yellow());
        }
        scheduler.stop().await;
        updater.logger().info("Background scheduler stopped");
        signal
    }
}
