//! Test utilities for vsix-updater
//!
//! In-memory fakes for every host trait plus a [`TestHost`] builder that
//! wires them into an [`Updater`](crate::updater::Updater). Nothing here
//! touches the network, the real filesystem or a real editor.
//!
//! # Example
//!
//! ```rust,no_run
//! use vsix_updater::test_utils::TestHost;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let env = TestHost::with_urls(&["https://updates.example.com/api"]);
//! env.editor.with_installed("pub.ext", "1.1.0");
//! env.notifier.answer("Ignore");
//!
//! env.updater().background_check().await?;
//! assert_eq!(env.notifier.prompts().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod fakes;

pub use builder::{TEST_STORAGE_DIR, TEST_WORKSPACE_DIR, TestHost};
pub use fakes::{
    FakeEditor, FakeHttp, MemoryFileSystem, MemorySink, MemoryStateStore, ProgressEvent, Prompt,
    ScriptedNotifier, StaticSettings,
};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`. With neither set, tests
/// run without a subscriber.
///
/// ```bash
/// RUST_LOG=vsix_updater=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Metadata document as served by an update endpoint.
pub fn metadata_json(id: &str, name: &str, version: (u64, u64, u64), download: Option<&str>) -> serde_json::Value {
    let mut doc = serde_json::json!({
        "id": id,
        "displayName": name,
        "name": name,
        "version": { "major": version.0, "minor": version.1, "patch": version.2 },
    });
    if let Some(download) = download {
        doc["download"] = serde_json::Value::String(download.to_string());
    }
    doc
}
