//! Builder wiring the in-memory fakes into a [`Host`] and [`Updater`].

use super::fakes::{
    FakeEditor, FakeHttp, MemoryFileSystem, MemorySink, MemoryStateStore, ScriptedNotifier,
    StaticSettings,
};
use crate::config::{UpdaterConfig, VersionPolicy};
use crate::host::Host;
use crate::logger::Logger;
use crate::updater::Updater;
use std::path::PathBuf;
use std::sync::Arc;

/// Storage directory every test host starts with.
pub const TEST_STORAGE_DIR: &str = "/storage";

/// Workspace folder every test host starts with.
pub const TEST_WORKSPACE_DIR: &str = "/workspace";

/// Fully faked host with handles to every collaborator.
pub struct TestHost {
    pub http: Arc<FakeHttp>,
    pub fs: Arc<MemoryFileSystem>,
    pub editor: Arc<FakeEditor>,
    pub notifier: Arc<ScriptedNotifier>,
    pub state: Arc<MemoryStateStore>,
    pub settings: Arc<StaticSettings>,
    pub log: MemorySink,
}

impl TestHost {
    /// Host configured with `urls`, a storage dir and one workspace folder.
    pub fn with_urls(urls: &[&str]) -> Self {
        let config = UpdaterConfig {
            api_urls: urls.iter().map(|u| (*u).to_string()).collect(),
            storage_dir: Some(PathBuf::from(TEST_STORAGE_DIR)),
            workspace_folders: vec![PathBuf::from(TEST_WORKSPACE_DIR)],
            ..UpdaterConfig::default()
        };

        let fs = Arc::new(MemoryFileSystem::default());
        let editor = Arc::new(FakeEditor::default());
        editor.observe(Arc::clone(&fs));

        Self {
            http: Arc::new(FakeHttp::default()),
            fs,
            editor,
            notifier: Arc::new(ScriptedNotifier::default()),
            state: Arc::new(MemoryStateStore::default()),
            settings: Arc::new(StaticSettings::new(config)),
            log: MemorySink::default(),
        }
    }

    /// Host with no endpoints configured.
    pub fn unconfigured() -> Self {
        Self::with_urls(&[])
    }

    /// Drop the workspace folder fallback.
    pub fn without_workspace(self) -> Self {
        self.settings.update(|c| c.workspace_folders.clear());
        self
    }

    /// Switch the version comparison rule.
    pub fn with_policy(self, policy: VersionPolicy) -> Self {
        self.settings.update(|c| c.version_policy = policy);
        self
    }

    /// Host bundle sharing this builder's fakes.
    pub fn host(&self) -> Host {
        Host {
            http: self.http.clone(),
            fs: self.fs.clone(),
            editor: self.editor.clone(),
            notifier: self.notifier.clone(),
            state: self.state.clone(),
            settings: self.settings.clone(),
        }
    }

    /// Updater bound to this host, logging into [`TestHost::log`].
    pub fn updater(&self) -> Updater {
        Updater::new(self.host(), Logger::to_writer(self.log.clone()))
    }

    /// Storage path of a package file.
    pub fn storage_path(&self, file_name: &str) -> PathBuf {
        PathBuf::from(TEST_STORAGE_DIR).join(file_name)
    }

    /// Workspace path of a package file.
    pub fn workspace_path(&self, file_name: &str) -> PathBuf {
        PathBuf::from(TEST_WORKSPACE_DIR).join(file_name)
    }
}
