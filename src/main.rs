//! vsix-updater CLI entry point
//!
//! Parses arguments, runs the command and renders errors with a suggestion.
//!
//! - `check` - install the package of every configured endpoint
//! - `background-check` - prompt for differing versions once
//! - `watch` - hourly background checks until Ctrl-C
//! - `ignores` - list or clear ignored updates
//! - `config` - show, create or locate the configuration file

use anyhow::Result;
use clap::Parser;
use vsix_updater::cli;
use vsix_updater::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
