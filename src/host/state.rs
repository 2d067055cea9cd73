//! Durable key/value state stored as a JSON file.

use super::{IgnoreEntry, StateStore};
use crate::core::UpdaterError;
use crate::utils::FileLock;
use crate::utils::fs::atomic_write;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// [`StateStore`] persisted to a single JSON object on disk.
///
/// The file is re-read on every operation so that a scheduler process and a
/// manual invocation sharing the same file observe each other's writes.
/// Writes go through a write-then-rename, and each read-modify-write holds an
/// exclusive lock on a sibling `.lock` file so concurrent processes never drop
/// each other's entries.
#[derive(Debug)]
pub struct JsonStateStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonStateStore {
    /// Store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Backing file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    async fn read_all(&self) -> Result<BTreeMap<String, IgnoreEntry>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read state from {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .map_err(UpdaterError::from)
            .with_context(|| format!("Failed to parse state from {}", self.path.display()))
    }

    async fn write_all(&self, entries: &BTreeMap<String, IgnoreEntry>) -> Result<()> {
        let content = serde_json::to_vec_pretty(entries).context("Failed to serialize state")?;
        atomic_write(&self.path, &content).await?;
        debug!("Saved {} state entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn get(&self, key: &str) -> Result<Option<IgnoreEntry>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, entry: IgnoreEntry) -> Result<()> {
        let _guard = self.lock.lock().await;
        let _file_lock = FileLock::acquire(&self.lock_path()).await?;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), entry);
        self.write_all(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let _file_lock = FileLock::acquire(&self.lock_path()).await?;
        let mut entries = self.read_all().await?;
        let existed = entries.remove(key).is_some();
        if existed {
            self.write_all(&entries).await?;
        }
        Ok(existed)
    }

    async fn entries(&self) -> Result<BTreeMap<String, IgnoreEntry>> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }
}
