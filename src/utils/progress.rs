//! Progress indicators.
//!
//! Thin wrapper over `indicatif` that honours `VSIX_UPDATER_NO_PROGRESS`:
//! when the variable holds a truthy value every bar is created hidden, which
//! keeps CI logs and piped output clean. Values are read the way clap reads
//! the `--no-progress` env fallback, so `0`, `false`, `no` and `off` leave
//! progress on.

use crate::constants::NO_PROGRESS_ENV_VAR;
use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

fn is_progress_disabled() -> bool {
    env_flag_enabled(std::env::var(NO_PROGRESS_ENV_VAR).ok().as_deref())
}

/// Whether a boolean environment flag is on.
///
/// Unset, empty and the falsey spellings clap accepts are off; anything else
/// is on.
#[must_use]
pub fn env_flag_enabled(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return false;
    };
    let value = value.trim().to_ascii_lowercase();
    !matches!(value.as_str(), "" | "0" | "n" | "no" | "f" | "false" | "off")
}

/// A spinner with consistent styling.
#[derive(Debug, Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Indeterminate spinner, ticking every 100ms.
    #[must_use]
    pub fn new_spinner() -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// Spinner that never draws; lines printed through it go to stderr.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            inner: IndicatifBar::hidden(),
        }
    }

    /// Replace the message shown beside the spinner.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Print a line above the spinner without corrupting it.
    pub fn println(&self, line: impl AsRef<str>) {
        if self.inner.is_hidden() {
            eprintln!("{}", line.as_ref());
        } else {
            self.inner.println(line.as_ref());
        }
    }

    /// Remove the spinner from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }

    /// Handle to the underlying bar, for `suspend` around prompts.
    #[must_use]
    pub fn clone_inner(&self) -> IndicatifBar {
        self.inner.clone()
    }
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_spinner())
}
