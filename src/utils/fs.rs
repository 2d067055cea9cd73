//! File system helpers.
//!
//! - [`write_file`] is the single write path used by the install workflow. It
//!   normalises host path quirks, encodes text as UTF-8 and hands the bytes to
//!   the host [`FileSystem`]. Failures propagate to the caller untouched so the
//!   caller can decide on a fallback location.
//! - [`atomic_write`] backs the updater's own state files.

use crate::host::FileSystem;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Content accepted by [`write_file`].
#[derive(Debug, Clone, Copy)]
pub enum FileContent<'a> {
    /// UTF-8 text.
    Text(&'a str),
    /// Raw bytes.
    Bytes(&'a [u8]),
}

impl FileContent<'_> {
    /// Content as bytes; text is UTF-8 encoded.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileContent::Text(text) => text.as_bytes(),
            FileContent::Bytes(bytes) => bytes,
        }
    }
}

impl<'a> From<&'a str> for FileContent<'a> {
    fn from(text: &'a str) -> Self {
        FileContent::Text(text)
    }
}

impl<'a> From<&'a [u8]> for FileContent<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        FileContent::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for FileContent<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        FileContent::Bytes(bytes.as_slice())
    }
}

/// Strip the separator some hosts put in front of a Windows drive letter.
///
/// URI-derived paths come out as `/c:/Users/me/pkg.vsix`; on Windows the
/// leading separator has to go before the path is usable. Other paths, and
/// every path when `windows` is false, are returned unchanged.
#[must_use]
pub fn normalize_host_path(raw: &str, windows: bool) -> PathBuf {
    if windows {
        let bytes = raw.as_bytes();
        let has_drive_artifact = bytes.len() >= 3
            && matches!(bytes[0], b'/' | b'\\')
            && bytes[1].is_ascii_alphabetic()
            && bytes[2] == b':';
        if has_drive_artifact {
            return PathBuf::from(&raw[1..]);
        }
    }
    PathBuf::from(raw)
}

/// Write `content` to `path` through the host filesystem.
///
/// Returns the normalised path that was written.
pub async fn write_file<'a>(
    fs: &dyn FileSystem,
    path: &Path,
    content: impl Into<FileContent<'a>>,
) -> Result<PathBuf> {
    let normalized = if cfg!(windows) {
        normalize_host_path(&path.to_string_lossy(), true)
    } else {
        path.to_path_buf()
    };
    let content = content.into();
    fs.write(&normalized, content.as_bytes()).await?;
    Ok(normalized)
}

/// Check that `name` is a single plain file name.
///
/// Rejects empty names, path separators, and `.`/`..`, so a remote package
/// name can never escape the directory it is joined onto.
pub fn validate_file_name(name: &str) -> std::result::Result<(), String> {
    if name.trim().is_empty() {
        return Err("name is empty".to_string());
    }
    if name.contains('/') || name.contains('\\') {
        return Err("name contains a path separator".to_string());
    }
    if name == "." || name == ".." {
        return Err("name is a relative directory reference".to_string());
    }
    if name.contains('\0') {
        return Err("name contains a NUL byte".to_string());
    }
    Ok(())
}

/// Create `path` and all parents.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

/// Write bytes via a temporary sibling file and rename.
///
/// Readers never observe a partially written file. Parent directories are
/// created as needed.
pub async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent).await?;
        }
    }

    let temp_path = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&temp_path)
            .await
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
        file.write_all(content)
            .await
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;
        file.sync_all().await.context("Failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .await
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))
}
