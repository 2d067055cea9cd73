//! Local filesystem binding.

use super::FileSystem;
use crate::core::UpdaterError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// [`FileSystem`] over `tokio::fs`.
///
/// Writes do not create missing parent directories: an absent storage
/// directory is a write failure, which is what triggers the workspace-folder
/// fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        debug!("Writing {} bytes to {}", data.len(), path.display());
        fs::write(path, data)
            .await
            .map_err(UpdaterError::from)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    async fn delete(&self, path: &Path) -> Result<()> {
        debug!("Deleting {}", path.display());
        fs::remove_file(path)
            .await
            .map_err(UpdaterError::from)
            .with_context(|| format!("Failed to delete {}", path.display()))
    }
}
