//! Remembered "Ignore" answers.

use super::CliConfig;
use crate::config::state_path_for;
use crate::host::{JsonStateStore, SettingsSource};
use crate::updater::IgnoreStore;
use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};
use colored::Colorize;

/// Inspect or reset ignored updates.
///
/// An ignore flag is keyed by extension id and the version installed when
/// "Ignore" was picked, so it stops applying once that version changes.
/// Flags older than `ignore_ttl_days` are dropped before each background
/// check.
#[derive(Args, Debug)]
pub struct IgnoresCommand {
    #[command(subcommand)]
    command: IgnoresSubcommands,
}

#[derive(Subcommand, Debug)]
enum IgnoresSubcommands {
    /// List ignore flags with their age.
    List,

    /// Forget every ignore flag.
    Clear,
}

impl IgnoresCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let settings = config.settings()?;
        let ttl_days = settings.load().await?.ignore_ttl_days;
        let state = JsonStateStore::new(state_path_for(settings.path()));
        let ignores = IgnoreStore::new(&state, ttl_days);

        match self.command {
            IgnoresSubcommands::List => {
                let entries = ignores.list().await?;
                if entries.is_empty() {
                    println!("No ignored updates.");
                    return Ok(());
                }

                println!("{}", "Ignored updates:".bold());
                let now = Utc::now();
                for (key, entry) in entries {
                    let age = (now - entry.set_at).num_days();
                    let expired = ignores.is_expired(&entry, now);
                    let note = if expired { " (expired)".dimmed().to_string() } else { String::new() };
                    println!("  {} set {} day(s) ago{}", key.cyan(), age, note);
                }
            }
            IgnoresSubcommands::Clear => {
                let removed = ignores.clear().await?;
                println!("✅ Cleared {removed} ignore flag(s)");
            }
        }
        Ok(())
    }
}
