//! Terminal notifications and prompts.

use super::Notifier;
use crate::constants::CHANNEL_TITLE;
use crate::utils::progress::ProgressBar;
use async_trait::async_trait;
use colored::Colorize;
use std::io::IsTerminal;
use std::sync::Mutex;
use tracing::{debug, warn};

/// [`Notifier`] that prints to the terminal and prompts with `dialoguer`.
///
/// Prompts are answered automatically with the first action when
/// `assume_yes` is set. Without a terminal on stdin (and without
/// `assume_yes`) prompts are treated as dismissed.
pub struct TerminalNotifier {
    assume_yes: bool,
    interactive: bool,
    show_progress: bool,
    progress: Mutex<Option<ProgressBar>>,
}

impl TerminalNotifier {
    /// Create a notifier, probing stdin for interactivity.
    #[must_use]
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            interactive: std::io::stdin().is_terminal(),
            show_progress: true,
            progress: Mutex::new(None),
        }
    }

    /// Draw spinners while progress is active. On by default.
    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn print(&self, line: String) {
        if let Ok(slot) = self.progress.lock() {
            if let Some(bar) = &*slot {
                bar.println(line);
                return;
            }
        }
        eprintln!("{line}");
    }

    fn active_bar(&self) -> Option<indicatif::ProgressBar> {
        self.progress.lock().ok()?.as_ref().map(ProgressBar::clone_inner)
    }
}

#[async_trait]
impl Notifier for TerminalNotifier {
    async fn show_info(&self, message: &str, actions: &[&str]) -> Option<String> {
        self.print(format!("{} {}", "info:".cyan().bold(), message));

        if actions.is_empty() {
            return None;
        }
        if self.assume_yes {
            debug!("Auto-selecting '{}' for prompt", actions[0]);
            return Some(actions[0].to_string());
        }
        if !self.interactive {
            debug!("No terminal attached, treating prompt as dismissed");
            return None;
        }

        let mut choices: Vec<String> = actions.iter().map(|a| (*a).to_string()).collect();
        choices.push("Dismiss".to_string());
        let prompt = format!("{CHANNEL_TITLE}: choose an action");
        let bar = self.active_bar();

        let picked = tokio::task::spawn_blocking(move || {
            let select = || {
                dialoguer::Select::new()
                    .with_prompt(&prompt)
                    .items(&choices)
                    .default(0)
                    .interact_opt()
                    .map(|idx| idx.and_then(|i| choices.get(i).cloned()))
            };
            match bar {
                Some(bar) => bar.suspend(select),
                None => select(),
            }
        })
        .await;

        match picked {
            Ok(Ok(Some(choice))) if actions.contains(&choice.as_str()) => Some(choice),
            Ok(Ok(_)) => None,
            Ok(Err(e)) => {
                warn!("Prompt failed: {}", e);
                None
            }
            Err(e) => {
                warn!("Prompt task failed: {}", e);
                None
            }
        }
    }

    async fn show_warning(&self, message: &str) {
        self.print(format!("{} {}", "warning:".yellow().bold(), message));
    }

    async fn show_error(&self, message: &str) {
        self.print(format!("{} {}", "error:".red().bold(), message));
    }

    fn begin_progress(&self, title: &str) {
        let bar = if self.show_progress { ProgressBar::new_spinner() } else { ProgressBar::hidden() };
        bar.set_message(title.to_string());
        if let Ok(mut slot) = self.progress.lock() {
            *slot = Some(bar);
        }
    }

    fn end_progress(&self) {
        if let Ok(mut slot) = self.progress.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }
}
