//! Editor binding through the editor's command-line launcher.
//!
//! VS Code and its forks ship a launcher (`code`, `codium`, `cursor`, ...)
//! that can list and install extensions without a running window:
//!
//! ```text
//! code --list-extensions --show-versions   # publisher.name@1.2.3 per line
//! code --install-extension ./pkg.vsix --force
//! ```

use super::{Editor, InstalledExtension};
use crate::core::UpdaterError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// [`Editor`] backed by an editor launcher found in `PATH`.
#[derive(Debug, Clone)]
pub struct CodeCli {
    command: String,
}

impl CodeCli {
    /// Use the launcher named `command` (looked up lazily in `PATH`).
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn resolve(&self) -> Result<PathBuf> {
        which::which(&self.command).map_err(|_| {
            UpdaterError::EditorNotFound {
                command: self.command.clone(),
            }
            .into()
        })
    }

    async fn run(&self, operation: &str, args: &[&OsStr]) -> Result<String> {
        let program = self.resolve()?;
        debug!("Running {} {:?}", program.display(), args);

        let output = Command::new(&program)
            .args(args)
            .output()
            .await
            .map_err(UpdaterError::from)
            .with_context(|| format!("Failed to spawn {}", program.display()))?;

        if !output.status.success() {
            return Err(UpdaterError::EditorCommandFailed {
                operation: operation.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse `--list-extensions --show-versions` output.
///
/// Lines without an `@` separator are skipped.
#[must_use]
pub fn parse_extension_list(output: &str) -> Vec<InstalledExtension> {
    output
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            let (id, version) = line.rsplit_once('@')?;
            if id.is_empty() || version.is_empty() {
                return None;
            }
            Some(InstalledExtension {
                id: id.to_string(),
                version: version.to_string(),
            })
        })
        .collect()
}

#[async_trait]
impl Editor for CodeCli {
    async fn installed_extensions(&self) -> Result<Vec<InstalledExtension>> {
        let stdout = self
            .run("list extensions", &[OsStr::new("--list-extensions"), OsStr::new("--show-versions")])
            .await?;
        let extensions = parse_extension_list(&stdout);
        debug!("Editor reports {} installed extensions", extensions.len());
        Ok(extensions)
    }

    async fn install_extension_from_file(&self, path: &Path) -> Result<()> {
        self.run(
            "install extension",
            &[OsStr::new("--install-extension"), path.as_os_str(), OsStr::new("--force")],
        )
        .await?;
        Ok(())
    }

    async fn reload_window(&self) -> Result<()> {
        // The launcher has no reload verb; a running window picks the new
        // version up on its next reload.
        info!("Reload the {} window to activate the updated extension", self.command);
        Ok(())
    }
}
