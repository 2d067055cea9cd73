//! vsix-updater keeps editor extensions that are published outside the
//! marketplace up to date.
//!
//! Each configured update endpoint answers with a small JSON document naming
//! an extension, its latest version and where to download the `.vsix`
//! package. The crate compares that version with the one the editor has
//! installed and either prompts ("Update" / "Ignore") or downloads, installs
//! and cleans up the package directly.
//!
//! # Architecture
//!
//! - [`updater`]: the workflows ([`updater::Updater::background_check`],
//!   [`updater::Updater::check_for_updates`]) and the hourly
//!   [`updater::BackgroundScheduler`]
//! - [`host`]: traits for everything outside the process (HTTP, filesystem,
//!   editor, notifications, persisted state, settings) plus the real
//!   bindings used by the CLI
//! - [`config`]: the TOML configuration file
//! - [`logger`]: the timestamped output-channel log
//! - [`cli`]: the `vsix-updater` command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use vsix_updater::cli::CliConfig;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let updater = CliConfig::new().build_updater().await?;
//! updater.background_check().await?;
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod updater;

// Host integration
pub mod host;
pub mod logger;

// Supporting modules
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
