//! OS file locks for coordinating separate updater processes.
//!
//! The hourly `watch` process and a manual `check` are different processes
//! sharing the same state file and download directory. An exclusive lock on a
//! lock file next to that state serialises them. The lock is released when
//! the [`FileLock`] is dropped.
//!
//! File operations run under `spawn_blocking` so a waiting lock never stalls
//! a tokio worker.

use anyhow::{Context, Result};
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Exclusive lock held on a lock file.
#[derive(Debug)]
pub struct FileLock {
    _file: File,
    path: PathBuf,
}

impl FileLock {
    /// Wait until the exclusive lock on `path` is available.
    ///
    /// The lock file and its parent directory are created if missing.
    pub async fn acquire(path: &Path) -> Result<Self> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || -> Result<Self> {
            let file = open_lock_file(&path)?;
            file.lock_exclusive()
                .with_context(|| format!("Failed to lock {}", path.display()))?;
            debug!("Acquired lock {}", path.display());
            Ok(Self {
                _file: file,
                path,
            })
        })
        .await
        .context("Lock task panicked")?
    }

    /// Take the lock on `path` only if nobody else holds it.
    ///
    /// Returns `Ok(None)` when another holder, in this or another process,
    /// has it.
    pub async fn try_acquire(path: &Path) -> Result<Option<Self>> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || -> Result<Option<Self>> {
            let file = open_lock_file(&path)?;
            match file.try_lock_exclusive() {
                Ok(true) => {
                    debug!("Acquired lock {}", path.display());
                    Ok(Some(Self {
                        _file: file,
                        path,
                    }))
                }
                Ok(false) => Ok(None),
                Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
                Err(e) => Err(e).with_context(|| format!("Failed to lock {}", path.display())),
            }
        })
        .await
        .context("Lock task panicked")?
    }

    /// Lock file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Closing the handle releases the lock. The file stays so that
        // concurrent openers always lock the same inode.
        debug!("Released lock {}", self.path.display());
    }
}

fn open_lock_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create lock directory: {}", parent.display()))?;
        }
    }
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("Failed to open lock file: {}", path.display()))
}
