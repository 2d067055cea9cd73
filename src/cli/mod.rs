//! Command-line interface for vsix-updater.
//!
//! # Available Commands
//!
//! - `check` - download and install the package of every configured endpoint
//! - `background-check` - run the silent check once (prompt before installing)
//! - `watch` - run the silent check at the top of every hour until Ctrl-C
//! - `ignores` - list or clear remembered "Ignore" answers
//! - `config` - show, create or locate the configuration file
//!
//! # Usage
//!
//! ```bash
//! # Create a config and point it at an update endpoint
//! vsix-updater config init
//!
//! # Install whatever the endpoints publish
//! vsix-updater check
//!
//! # Keep checking in the background, answering prompts in this terminal
//! vsix-updater watch
//!
//! # Non-interactive: accept every prompt, no spinners
//! vsix-updater --yes --no-progress background-check
//! ```
//!
//! Every command accepts `--config PATH` (or `VSIX_UPDATER_CONFIG`) to use a
//! configuration file other than `~/.vsix-updater/config.toml`.

mod check;
mod config;
mod ignores;
mod watch;

#[cfg(test)]
mod tests;

use crate::config::{UpdaterConfig, check_lock_path_for, state_path_for};
use crate::host::{
    CodeCli, FileSettings, Host, JsonStateStore, LocalFileSystem, ReqwestHttpClient,
    SettingsSource, TerminalNotifier,
};
use crate::logger::Logger;
use crate::updater::Updater;
use crate::utils::fs::ensure_dir;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Settings derived from the global flags.
///
/// Kept separate from [`Cli`] so tests can build one directly and so the
/// command implementations never look at raw flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Tracing filter used when `RUST_LOG` is unset. `None` disables tracing.
    pub log_level: Option<String>,

    /// Keep spinners hidden.
    pub no_progress: bool,

    /// Answer every prompt with its first action.
    pub assume_yes: bool,

    /// Explicit configuration file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` always wins. Otherwise the level chosen by the flags is
    /// used, and with `--quiet` no subscriber is installed at all.
    pub fn init_tracing(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if let Some(level) = &self.log_level {
            EnvFilter::new(level)
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Resolved configuration file location.
    pub fn config_file(&self) -> Result<PathBuf> {
        UpdaterConfig::resolve_path(self.config_path.as_deref())
    }

    /// Settings source for the resolved config file.
    ///
    /// The current directory stands in for the editor's first workspace
    /// folder when the file lists none.
    pub fn settings(&self) -> Result<FileSettings> {
        let cwd = std::env::current_dir().ok();
        Ok(FileSettings::new(self.config_file()?).with_default_workspace(cwd))
    }

    /// Wire the real host bindings into an [`Updater`].
    ///
    /// Reads the configuration once for the values that shape the bindings
    /// (timeout, editor launcher, log file). The workflow itself reloads it on
    /// every check.
    pub async fn build_updater(&self) -> Result<Updater> {
        let config_path = self.config_file()?;
        let settings = self.settings()?;
        let config = settings.load().await?;

        if let Ok(dir) = config.storage_dir() {
            if let Err(e) = ensure_dir(&dir).await {
                // The install workflow falls back to the workspace folder.
                warn!("{:#}", e);
            }
        }

        let logger = match config.log_file() {
            Ok(path) => Logger::to_file(&path).unwrap_or_else(|e| {
                warn!("Cannot open log file {}: {}", path.display(), e);
                Logger::disabled()
            }),
            Err(e) => {
                warn!("No log file location: {:#}", e);
                Logger::disabled()
            }
        };

        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        debug!(
            "Building host: editor '{}', timeout {:?}, config {}",
            config.editor_command,
            timeout,
            config_path.display()
        );

        let host = Host {
            http: Arc::new(ReqwestHttpClient::new(timeout)?),
            fs: Arc::new(LocalFileSystem),
            editor: Arc::new(CodeCli::new(config.editor_command.clone())),
            notifier: Arc::new(TerminalNotifier::new(self.assume_yes).with_progress(!self.no_progress)),
            state: Arc::new(JsonStateStore::new(state_path_for(&config_path))),
            settings: Arc::new(settings),
        };

        Ok(Updater::new(host, logger).with_lock_file(check_lock_path_for(&config_path)))
    }
}

/// Checks remote endpoints for newer editor extension packages.
#[derive(Parser)]
#[command(
    name = "vsix-updater",
    about = "Keep editor extensions published outside the marketplace up to date",
    version,
    long_about = "vsix-updater polls update endpoints for extension metadata, compares the published \
                  version with the installed one, and downloads and installs .vsix packages \
                  through the editor's command-line launcher."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output. Equivalent to `RUST_LOG=debug`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress diagnostic output. Notifications are still printed.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file.
    ///
    /// Defaults to `~/.vsix-updater/config.toml`. The state file and default
    /// download directory live beside it.
    #[arg(short, long, global = true, env = "VSIX_UPDATER_CONFIG")]
    config: Option<PathBuf>,

    /// Answer every prompt with its first action ("Update", "Reload window").
    #[arg(short, long, global = true)]
    yes: bool,

    /// Disable spinners.
    #[arg(long, global = true, env = "VSIX_UPDATER_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and install the package published by every endpoint.
    ///
    /// See [`check::CheckCommand`].
    Check(check::CheckCommand),

    /// Compare published and installed versions once, prompting before any install.
    ///
    /// See [`check::BackgroundCheckCommand`].
    BackgroundCheck(check::BackgroundCheckCommand),

    /// Run the background check at the top of every hour until interrupted.
    ///
    /// See [`watch::WatchCommand`].
    Watch(watch::WatchCommand),

    /// Manage remembered "Ignore" answers.
    ///
    /// See [`ignores::IgnoresCommand`].
    Ignores(ignores::IgnoresCommand),

    /// Manage the configuration file.
    ///
    /// See [`config::ConfigCommand`].
    Config(config::ConfigCommand),
}

impl Cli {
    /// Build the [`CliConfig`], set up tracing and run the command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_tracing();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            assume_yes: self.yes,
            config_path: self.config.clone(),
        }
    }

    /// Run the command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Check(cmd) => cmd.execute(&config).await,
            Commands::BackgroundCheck(cmd) => cmd.execute(&config).await,
            Commands::Watch(cmd) => cmd.execute(&config).await,
            Commands::Ignores(cmd) => cmd.execute(&config).await,
            Commands::Config(cmd) => cmd.execute(&config).await,
        }
    }
}
