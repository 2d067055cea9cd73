//! Configuration file management.
//!
//! ```bash
//! vsix-updater config init            # write an example file
//! vsix-updater config init --force    # overwrite an existing one
//! vsix-updater config show            # effective settings (the default)
//! vsix-updater config path            # where the file lives
//! ```

use super::CliConfig;
use crate::config::UpdaterConfig;
use crate::host::SettingsSource;
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::Path;

/// Manage the configuration file.
///
/// Shows the effective configuration when no subcommand is given.
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Subcommand, Debug)]
enum ConfigSubcommands {
    /// Write an example configuration file.
    ///
    /// Refuses to overwrite an existing file unless `--force` is given.
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration, defaults filled in.
    Show,

    /// Print the configuration file location.
    Path,
}

impl ConfigCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        match self.command {
            Some(ConfigSubcommands::Init {
                force,
            }) => Self::init(&config.config_file()?, force).await,
            Some(ConfigSubcommands::Show) | None => Self::show(config).await,
            Some(ConfigSubcommands::Path) => {
                println!("{}", config.config_file()?.display());
                Ok(())
            }
        }
    }

    async fn init(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            println!("❌ Config already exists at: {}", path.display());
            println!("   Use --force to overwrite");
            return Ok(());
        }

        let example = UpdaterConfig::init_example();
        example.save_to(path).await?;

        println!("✅ Created config at: {}", path.display());
        println!("\n{}", "Example configuration:".bold());
        println!("{}", toml::to_string_pretty(&example)?);
        println!("\n{}", "Next steps:".yellow());
        println!("  1. Replace the example URL in api_urls with your update endpoints");
        println!("  2. Run 'vsix-updater check' to install the published packages");
        Ok(())
    }

    async fn show(config: &CliConfig) -> Result<()> {
        let settings = config.settings()?;
        let effective = settings.load().await?;

        println!("{}", "Configuration".bold());
        println!("Location: {}\n", settings.path().display());
        println!("{}", toml::to_string_pretty(&effective)?);

        if effective.api_urls.is_empty() {
            println!("{}", "Tip:".yellow());
            println!("  Run 'vsix-updater config init' to create an example configuration");
        }
        Ok(())
    }
}
