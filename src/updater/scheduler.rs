//! Hourly background scheduler.
//!
//! Fires at the top of every hour (`0 * * * *`) and runs
//! [`Updater::background_check`]. The scheduler is an owned resource: it
//! starts a tokio task in [`BackgroundScheduler::start`] and is shut down by
//! [`BackgroundScheduler::stop`]. Dropping it without stopping aborts the task.

use super::{RunStatus, Updater};
use crate::constants::BACKGROUND_CHECK_PERIOD;
use chrono::{DateTime, Timelike, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Scheduler options.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulerOptions {
    /// Run one check immediately instead of waiting for the first hour boundary.
    pub run_on_start: bool,
}

/// Time left until the next top of the hour after `now`.
///
/// Exactly on the hour this is a full period, never zero.
#[must_use]
pub fn duration_until_next_tick(now: DateTime<Utc>) -> Duration {
    let into_hour = Duration::new(
        u64::from(now.minute()) * 60 + u64::from(now.second()),
        // Leap seconds report nanoseconds >= 1e9.
        now.nanosecond().min(999_999_999),
    );
    BACKGROUND_CHECK_PERIOD.checked_sub(into_hour).unwrap_or(Duration::ZERO)
}

/// Running background scheduler.
pub struct BackgroundScheduler {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundScheduler {
    /// Spawn the scheduler task.
    #[must_use]
    pub fn start(updater: Arc<Updater>, options: SchedulerOptions) -> Self {
        let (shutdown, rx) = watch::channel(false);
        let handle = tokio::spawn(run(updater, rx, options));
        debug!("Background scheduler started");
        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Whether the task is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal shutdown and wait for the task to exit. A check in flight runs
    /// to completion first, so a downloaded package is never left behind.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!("Background scheduler task failed: {}", e);
                }
            }
        }
        debug!("Background scheduler stopped");
    }
}

impl Drop for BackgroundScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn run(updater: Arc<Updater>, mut shutdown: watch::Receiver<bool>, options: SchedulerOptions) {
    if options.run_on_start && !tick(&updater, &shutdown).await {
        return;
    }

    loop {
        let wait = duration_until_next_tick(Utc::now());
        debug!("Next background check in {}s", wait.as_secs());

        tokio::select! {
            () = tokio::time::sleep(wait) => {
                if !tick(&updater, &shutdown).await {
                    return;
                }
            }
            _ = shutdown.changed() => return,
        }
    }
}

/// One scheduled check. Returns `false` when shutdown was requested before
/// or during it.
async fn tick(updater: &Updater, shutdown: &watch::Receiver<bool>) -> bool {
    if *shutdown.borrow() {
        return false;
    }
    updater.logger().info("Running background check");

    match updater.background_check().await {
        Ok(RunStatus::Skipped) => debug!("Background check skipped, another check is running"),
        Ok(_) => {}
        Err(e) => updater.logger().error(format!("Background check failed - {e:#}")),
    }
    !*shutdown.borrow()
}
