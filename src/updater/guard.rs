//! Single-slot guard shared by the scheduler and manual invocations.
//!
//! Inside one process the slot is a mutex. With a lock file configured it is
//! also an OS file lock, so an hourly `watch` process and a manual `check`
//! turn each other away as well.

use crate::utils::FileLock;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, MutexGuard};

/// Allows one check at a time. A second caller is turned away instead of
/// queueing.
#[derive(Debug, Default)]
pub struct CheckGuard {
    slot: Mutex<()>,
    lock_file: Option<PathBuf>,
}

/// Proof of holding the guard. Dropping it frees the slot.
#[derive(Debug)]
pub struct CheckSlot<'a> {
    _local: MutexGuard<'a, ()>,
    _file: Option<FileLock>,
}

impl CheckGuard {
    /// Guard that also takes an exclusive lock on `path`.
    #[must_use]
    pub fn with_lock_file(path: PathBuf) -> Self {
        Self {
            slot: Mutex::new(()),
            lock_file: Some(path),
        }
    }

    /// Lock file shared with other processes, if any.
    #[must_use]
    pub fn lock_file(&self) -> Option<&Path> {
        self.lock_file.as_deref()
    }

    /// Claim the slot, or `None` if a check is already running here or in
    /// another process.
    pub async fn try_acquire(&self) -> Result<Option<CheckSlot<'_>>> {
        let Ok(local) = self.slot.try_lock() else {
            return Ok(None);
        };
        let file = match &self.lock_file {
            Some(path) => match FileLock::try_acquire(path).await? {
                Some(lock) => Some(lock),
                None => return Ok(None),
            },
            None => None,
        };
        Ok(Some(CheckSlot {
            _local: local,
            _file: file,
        }))
    }

    /// Whether a check in this process currently holds the slot.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.slot.try_lock().is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_second_acquire_is_refused() {
        let guard = CheckGuard::default();
        let held = guard.try_acquire().await.unwrap();
        assert!(held.is_some());
        assert!(guard.is_busy());
        assert!(guard.try_acquire().await.unwrap().is_none());

        drop(held);
        assert!(!guard.is_busy());
        assert!(guard.try_acquire().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_guards_sharing_lock_file_exclude_each_other() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("check.lock");
        let first = CheckGuard::with_lock_file(path.clone());
        let second = CheckGuard::with_lock_file(path);

        let held = first.try_acquire().await.unwrap();
        assert!(held.is_some());
        assert!(second.try_acquire().await.unwrap().is_none());
        assert!(!second.is_busy());

        drop(held);
        assert!(second.try_acquire().await.unwrap().is_some());
    }
}
