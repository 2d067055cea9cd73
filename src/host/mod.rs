//! Host collaborators.
//!
//! The update workflow never talks to the network, the disk, the editor or the
//! user directly. Each of those is a narrow trait here, and [`Host`] bundles
//! one implementation of each. The binary wires in the concrete bindings from
//! the submodules; tests wire in the in-memory fakes from `test_utils`.

pub mod editor;
pub mod fs;
pub mod http;
pub mod notifier;
pub mod settings;
pub mod state;

use crate::config::UpdaterConfig;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub use editor::CodeCli;
pub use fs::LocalFileSystem;
pub use http::ReqwestHttpClient;
pub use notifier::TerminalNotifier;
pub use settings::FileSettings;
pub use state::JsonStateStore;

/// A fully buffered HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Raw body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// `true` for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One extension as reported by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledExtension {
    /// `publisher.name`, case as reported.
    pub id: String,
    /// Installed version string.
    pub version: String,
}

/// A persisted ignore flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreEntry {
    /// Whether prompts are suppressed.
    pub ignored: bool,
    /// When the flag was written.
    pub set_at: DateTime<Utc>,
}

/// HTTP GET.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch `url`. Non-2xx statuses are returned, not raised.
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// Filesystem write/delete.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Write `data` to `path`, replacing any existing file.
    async fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Remove the file at `path`.
    async fn delete(&self, path: &Path) -> Result<()>;
}

/// Editor operations.
#[async_trait]
pub trait Editor: Send + Sync {
    /// Snapshot of installed extensions.
    async fn installed_extensions(&self) -> Result<Vec<InstalledExtension>>;

    /// Install a packaged extension from a local file.
    async fn install_extension_from_file(&self, path: &Path) -> Result<()>;

    /// Reload the editor window.
    async fn reload_window(&self) -> Result<()>;
}

/// User-visible notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Informational message with optional actions. Returns the chosen
    /// action, or `None` when dismissed.
    async fn show_info(&self, message: &str, actions: &[&str]) -> Option<String>;

    /// Warning toast.
    async fn show_warning(&self, message: &str);

    /// Error toast.
    async fn show_error(&self, message: &str);

    /// Show a non-cancellable progress indicator.
    fn begin_progress(&self, title: &str);

    /// Hide the progress indicator.
    fn end_progress(&self);
}

/// Durable key/value state.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read one entry.
    async fn get(&self, key: &str) -> Result<Option<IgnoreEntry>>;

    /// Insert or overwrite one entry.
    async fn set(&self, key: &str, entry: IgnoreEntry) -> Result<()>;

    /// Remove one entry, returning whether it existed.
    async fn remove(&self, key: &str) -> Result<bool>;

    /// All entries, ordered by key.
    async fn entries(&self) -> Result<BTreeMap<String, IgnoreEntry>>;
}

/// Configuration source, read on every invocation.
#[async_trait]
pub trait SettingsSource: Send + Sync {
    /// Load the current configuration.
    async fn load(&self) -> Result<UpdaterConfig>;
}

/// Every collaborator the workflow needs.
#[derive(Clone)]
pub struct Host {
    pub http: Arc<dyn HttpClient>,
    pub fs: Arc<dyn FileSystem>,
    pub editor: Arc<dyn Editor>,
    pub notifier: Arc<dyn Notifier>,
    pub state: Arc<dyn StateStore>,
    pub settings: Arc<dyn SettingsSource>,
}
