//! Persisted "Ignore" answers.
//!
//! When the user answers a prompt with "Ignore", a flag keyed
//! `{id}-{installedVersion}-ignore` is stored. Keying on the installed
//! version means the prompt comes back once the user installs something
//! else. Flags older than the configured TTL are pruned before each silent
//! check so the store does not grow without bound.

use crate::constants::{IGNORE_KEY_SUFFIX, NOT_INSTALLED_MARKER};
use crate::host::{IgnoreEntry, StateStore};
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Key for one extension-id / installed-version pair.
#[must_use]
pub fn ignore_key(id: &str, installed_version: Option<&str>) -> String {
    format!(
        "{id}-{}-{IGNORE_KEY_SUFFIX}",
        installed_version.unwrap_or(NOT_INSTALLED_MARKER)
    )
}

/// Ignore flags over a host [`StateStore`].
pub struct IgnoreStore<'a> {
    state: &'a dyn StateStore,
    ttl_days: u64,
}

impl<'a> IgnoreStore<'a> {
    /// `ttl_days == 0` keeps flags forever.
    #[must_use]
    pub fn new(state: &'a dyn StateStore, ttl_days: u64) -> Self {
        Self {
            state,
            ttl_days,
        }
    }

    /// Whether `entry` is older than the retention period.
    #[must_use]
    pub fn is_expired(&self, entry: &IgnoreEntry, now: DateTime<Utc>) -> bool {
        if self.ttl_days == 0 {
            return false;
        }
        // Clamp far beyond any useful TTL; chrono panics near its range limit.
        let ttl = Duration::days(self.ttl_days.min(1_000_000) as i64);
        now - entry.set_at >= ttl
    }

    /// Whether prompts for `key` are currently suppressed.
    pub async fn is_ignored(&self, key: &str, now: DateTime<Utc>) -> Result<bool> {
        Ok(match self.state.get(key).await? {
            Some(entry) => entry.ignored && !self.is_expired(&entry, now),
            None => false,
        })
    }

    /// Suppress prompts for `key`.
    pub async fn ignore(&self, key: &str, now: DateTime<Utc>) -> Result<()> {
        self.state
            .set(
                key,
                IgnoreEntry {
                    ignored: true,
                    set_at: now,
                },
            )
            .await
    }

    /// Drop expired flags, returning how many were removed.
    pub async fn prune(&self, now: DateTime<Utc>) -> Result<usize> {
        if self.ttl_days == 0 {
            return Ok(0);
        }
        let mut removed = 0;
        for (key, entry) in self.state.entries().await? {
            if self.is_expired(&entry, now) && self.state.remove(&key).await? {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!("Pruned {} expired ignore flags", removed);
        }
        Ok(removed)
    }

    /// Every stored flag.
    pub async fn list(&self) -> Result<BTreeMap<String, IgnoreEntry>> {
        self.state.entries().await
    }

    /// Remove every flag, returning how many were removed.
    pub async fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for key in self.state.entries().await?.into_keys() {
            if self.state.remove(&key).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
