//! Extension update workflow.
//!
//! # Entry points
//!
//! - [`Updater::background_check`]: the unattended check the scheduler runs.
//!   It never installs without asking; for each endpoint it compares the
//!   published version with the installed one and prompts
//!   "Update" / "Ignore".
//! - [`Updater::check_for_updates`]: the manual command. For every endpoint
//!   it downloads the published package, installs it and offers a window
//!   reload.
//!
//! Both walk the configured endpoint list strictly in order, one endpoint
//! fully finishing (prompts included) before the next starts. A failure on
//! one endpoint is logged and the loop moves on; it never aborts the batch.
//! Both also share a [`CheckGuard`], so a scheduler tick that lands while a
//! manual check is running is skipped rather than racing it. With
//! [`Updater::with_lock_file`] the guard spans processes.
//!
//! ```text
//! BackgroundScheduler ──tick──▶ background_check ──"Update"──▶ install_from_url
//!                                                                   ▲
//! CLI `check` ───────────────▶ check_for_updates ──per URL──────────┘
//! ```
//!
//! # Module Structure
//!
//! - [`metadata`]: wire model, version comparison, package file names
//! - [`ignore`]: persisted "Ignore" answers
//! - [`guard`]: single-slot check guard
//! - [`scheduler`]: hourly background scheduler
//! - `checker` / `install`: the two workflows on [`Updater`]

mod checker;
pub mod guard;
pub mod ignore;
mod install;
pub mod metadata;
pub mod scheduler;


use crate::host::Host;
use crate::logger::Logger;
use std::path::PathBuf;

pub use guard::{CheckGuard, CheckSlot};
pub use ignore::{IgnoreStore, ignore_key};
pub use metadata::{ExtensionDescriptor, UpdateMetadata, Version};
pub use scheduler::BackgroundScheduler;

/// How an entry point finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every configured endpoint was processed (individual failures are logged).
    Completed,
    /// No endpoints are configured.
    NotConfigured,
    /// Another check held the guard; nothing was done.
    Skipped,
}

/// The update workflow, bound to one set of host collaborators.
pub struct Updater {
    host: Host,
    logger: Logger,
    guard: CheckGuard,
}

impl Updater {
    /// Bind the workflow to `host`, logging to `logger`.
    #[must_use]
    pub fn new(host: Host, logger: Logger) -> Self {
        Self {
            host,
            logger,
            guard: CheckGuard::default(),
        }
    }

    /// Share the check guard with other processes through the lock file at
    /// `path`.
    #[must_use]
    pub fn with_lock_file(mut self, path: PathBuf) -> Self {
        self.guard = CheckGuard::with_lock_file(path);
        self
    }

    /// Output-channel logger.
    #[must_use]
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Host collaborators.
    #[must_use]
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Whether a check is currently running in this process.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    fn log_skipped(&self) -> RunStatus {
        self.logger.info("Update check already in progress, skipping");
        RunStatus::Skipped
    }
}
