//! In-memory implementations of every host trait.
//!
//! Each fake records what the workflow did to it so tests can assert on
//! requests made, files written and deleted, prompts shown and so on.

use crate::config::UpdaterConfig;
use crate::host::{
    Editor, FileSystem, HttpClient, HttpResponse, IgnoreEntry, InstalledExtension, Notifier,
    SettingsSource, StateStore,
};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Canned HTTP responses keyed by URL. Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeHttp {
    routes: Mutex<HashMap<String, std::result::Result<HttpResponse, String>>>,
    requests: Mutex<Vec<String>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeHttp {
    /// Answer `url` with a JSON body.
    pub fn with_json(&self, url: &str, body: serde_json::Value) -> &Self {
        self.with_bytes(url, 200, body.to_string().into_bytes())
    }

    /// Answer `url` with `status` and an empty body.
    pub fn with_status(&self, url: &str, status: u16) -> &Self {
        self.with_bytes(url, status, Vec::new())
    }

    /// Answer `url` with `status` and `body`.
    pub fn with_bytes(&self, url: &str, status: u16, body: Vec<u8>) -> &Self {
        self.routes.lock().unwrap().insert(
            url.to_string(),
            Ok(HttpResponse {
                status,
                body,
            }),
        );
        self
    }

    /// Fail requests to `url` at the transport level.
    pub fn with_error(&self, url: &str, message: &str) -> &Self {
        self.routes.lock().unwrap().insert(url.to_string(), Err(message.to_string()));
        self
    }

    /// Hold every subsequent request until the returned handle is notified.
    pub fn hold(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for FakeHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(url.to_string());

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let route = self.routes.lock().unwrap().get(url).cloned();
        match route {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(HttpResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }
}

/// Filesystem held in memory, with injectable write failures.
#[derive(Default)]
pub struct MemoryFileSystem {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
    failing_roots: Mutex<Vec<PathBuf>>,
    writes: Mutex<Vec<PathBuf>>,
    deletes: Mutex<Vec<PathBuf>>,
}

impl MemoryFileSystem {
    /// Make every write below `root` fail.
    pub fn fail_writes_under(&self, root: impl Into<PathBuf>) -> &Self {
        self.failing_roots.lock().unwrap().push(root.into());
        self
    }

    /// Current content of `path`.
    pub fn read(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    /// Whether `path` currently exists.
    pub fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    /// Paths successfully written, in order.
    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.lock().unwrap().clone()
    }

    /// Paths deleted, in order.
    pub fn deletes(&self) -> Vec<PathBuf> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let failing = self.failing_roots.lock().unwrap().iter().any(|root| path.starts_with(root));
        if failing {
            return Err(anyhow!("permission denied: {}", path.display()));
        }
        self.files.lock().unwrap().insert(path.to_path_buf(), data.to_vec());
        self.writes.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn delete(&self, path: &Path) -> Result<()> {
        self.deletes.lock().unwrap().push(path.to_path_buf());
        match self.files.lock().unwrap().remove(path) {
            Some(_) => Ok(()),
            None => Err(anyhow!("no such file: {}", path.display())),
        }
    }
}

/// Editor with a fixed extension inventory that records install calls.
#[derive(Default)]
pub struct FakeEditor {
    installed: Mutex<Vec<InstalledExtension>>,
    installs: Mutex<Vec<PathBuf>>,
    reloads: AtomicUsize,
    fail_install: AtomicBool,
    fs: Mutex<Option<Arc<MemoryFileSystem>>>,
    present_at_install: Mutex<Vec<bool>>,
}

impl FakeEditor {
    /// Report `id` as installed at `version`.
    pub fn with_installed(&self, id: &str, version: &str) -> &Self {
        self.installed.lock().unwrap().push(InstalledExtension {
            id: id.to_string(),
            version: version.to_string(),
        });
        self
    }

    /// Make the install command fail.
    pub fn fail_installs(&self) -> &Self {
        self.fail_install.store(true, Ordering::SeqCst);
        self
    }

    /// Record whether the installed file exists in `fs` at install time.
    pub fn observe(&self, fs: Arc<MemoryFileSystem>) -> &Self {
        *self.fs.lock().unwrap() = Some(fs);
        self
    }

    /// Paths passed to the install command, in order.
    pub fn installs(&self) -> Vec<PathBuf> {
        self.installs.lock().unwrap().clone()
    }

    /// For each install call, whether the file existed at that moment.
    pub fn present_at_install(&self) -> Vec<bool> {
        self.present_at_install.lock().unwrap().clone()
    }

    /// Number of window reloads requested.
    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Editor for FakeEditor {
    async fn installed_extensions(&self) -> Result<Vec<InstalledExtension>> {
        Ok(self.installed.lock().unwrap().clone())
    }

    async fn install_extension_from_file(&self, path: &Path) -> Result<()> {
        self.installs.lock().unwrap().push(path.to_path_buf());
        let fs = self.fs.lock().unwrap().clone();
        if let Some(fs) = fs {
            self.present_at_install.lock().unwrap().push(fs.exists(path));
        }
        if self.fail_install.load(Ordering::SeqCst) {
            return Err(anyhow!("install command failed"));
        }
        Ok(())
    }

    async fn reload_window(&self) -> Result<()> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A prompt the workflow showed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub message: String,
    pub actions: Vec<String>,
}

/// Progress indicator transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Begin(String),
    End,
}

/// Notifier answering prompts from a queue.
///
/// A queued answer is only consumed by a prompt that offers it; any other
/// prompt is dismissed.
#[derive(Default)]
pub struct ScriptedNotifier {
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<Prompt>>,
    infos: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
    progress: Mutex<Vec<ProgressEvent>>,
}

impl ScriptedNotifier {
    /// Queue an answer.
    pub fn answer(&self, action: &str) -> &Self {
        self.answers.lock().unwrap().push_back(action.to_string());
        self
    }

    /// Prompts shown (messages with actions).
    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }

    /// Prompts whose actions include `action`.
    pub fn prompts_offering(&self, action: &str) -> Vec<Prompt> {
        self.prompts().into_iter().filter(|p| p.actions.iter().any(|a| a == action)).collect()
    }

    /// Plain informational messages.
    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    /// Warning toasts.
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    /// Error toasts.
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    /// Progress transitions.
    pub fn progress(&self) -> Vec<ProgressEvent> {
        self.progress.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for ScriptedNotifier {
    async fn show_info(&self, message: &str, actions: &[&str]) -> Option<String> {
        if actions.is_empty() {
            self.infos.lock().unwrap().push(message.to_string());
            return None;
        }
        self.prompts.lock().unwrap().push(Prompt {
            message: message.to_string(),
            actions: actions.iter().map(|a| (*a).to_string()).collect(),
        });

        let mut answers = self.answers.lock().unwrap();
        let offered = answers.front().is_some_and(|a| actions.contains(&a.as_str()));
        if offered { answers.pop_front() } else { None }
    }

    async fn show_warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    async fn show_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn begin_progress(&self, title: &str) {
        self.progress.lock().unwrap().push(ProgressEvent::Begin(title.to_string()));
    }

    fn end_progress(&self) {
        self.progress.lock().unwrap().push(ProgressEvent::End);
    }
}

/// State store held in memory.
#[derive(Default)]
pub struct MemoryStateStore {
    entries: Mutex<BTreeMap<String, IgnoreEntry>>,
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<IgnoreEntry>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, entry: IgnoreEntry) -> Result<()> {
        self.entries.lock().unwrap().insert(key.to_string(), entry);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }

    async fn entries(&self) -> Result<BTreeMap<String, IgnoreEntry>> {
        Ok(self.entries.lock().unwrap().clone())
    }
}

/// Settings that tests can change between invocations.
pub struct StaticSettings {
    config: Mutex<UpdaterConfig>,
    loads: AtomicUsize,
}

impl StaticSettings {
    /// Serve `config`.
    pub fn new(config: UpdaterConfig) -> Self {
        Self {
            config: Mutex::new(config),
            loads: AtomicUsize::new(0),
        }
    }

    /// Edit the served configuration.
    pub fn update(&self, edit: impl FnOnce(&mut UpdaterConfig)) {
        edit(&mut *self.config.lock().unwrap());
    }

    /// Number of times the configuration was read.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettingsSource for StaticSettings {
    async fn load(&self) -> Result<UpdaterConfig> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.config.lock().unwrap().clone())
    }
}

/// Shared in-memory log sink.
#[derive(Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    /// All lines written so far.
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).lines().map(str::to_string).collect()
    }

    /// Lines at `level` (`"INFO"`, `"WARNING"`, `"ERROR"`) containing `needle`.
    pub fn matching(&self, level: &str, needle: &str) -> Vec<String> {
        let prefix = format!("[\"{level}\" - ");
        self.lines()
            .into_iter()
            .filter(|line| line.starts_with(&prefix) && line.contains(needle))
            .collect()
    }

    /// Lines at `level`.
    pub fn at_level(&self, level: &str) -> Vec<String> {
        self.matching(level, "")
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
