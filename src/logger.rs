//! Output-channel logger.
//!
//! Mirrors an editor output channel: every call appends one line of the form
//!
//! ```text
//! ["INFO" - 2024-05-01T12:00:00.000Z]  Checking for updates with the following API Urls: ...
//! ```
//!
//! to a diagnostic sink (the updater's log file in the binary). The same
//! message is also emitted as a `tracing` event at the matching level. Sink
//! failures are swallowed; a logger without a sink only emits the tracing
//! events.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Severity of an output-channel line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        };
        f.write_str(label)
    }
}

type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Append-only, timestamped line logger.
#[derive(Clone, Default)]
pub struct Logger {
    sink: Option<Sink>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("has_sink", &self.sink.is_some()).finish()
    }
}

impl Logger {
    /// Logger without a sink.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Logger appending to any writer.
    #[must_use]
    pub fn to_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Some(Arc::new(Mutex::new(Box::new(writer)))),
        }
    }

    /// Logger appending to `path`, creating the file and its directory.
    pub fn to_file(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::to_writer(file))
    }

    /// INFO line.
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    /// WARNING line.
    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warning, message);
    }

    /// ERROR line.
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    /// Line at an explicit level.
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        let message = message.as_ref();
        match level {
            LogLevel::Info => tracing::info!(target: "vsix_updater::channel", "{}", message),
            LogLevel::Warning => tracing::warn!(target: "vsix_updater::channel", "{}", message),
            LogLevel::Error => tracing::error!(target: "vsix_updater::channel", "{}", message),
        }

        let Some(sink) = &self.sink else {
            return;
        };
        let line = format_line(level, Utc::now(), message);
        if let Ok(mut writer) = sink.lock() {
            let _ = writeln!(writer, "{line}");
            let _ = writer.flush();
        }
    }
}

/// Render one output-channel line.
#[must_use]
pub fn format_line(level: LogLevel, timestamp: DateTime<Utc>, message: &str) -> String {
    format!(
        "[\"{}\" - {}]  {}",
        level,
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        message
    )
}
