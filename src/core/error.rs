//! Error handling for the updater.
//!
//! Two layers, the same way the rest of the crate is built:
//!
//! - [`UpdaterError`] is the typed error for conditions the workflow needs to
//!   tell apart (bad metadata, unwritable destinations, missing editor).
//! - Application code returns [`anyhow::Result`] and attaches context with
//!   `.context(..)`. `main` converts whatever bubbles up into an
//!   [`ErrorContext`] through [`user_friendly_error`] so users see a message
//!   plus a suggestion instead of a raw error chain.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Typed failures raised by the update workflow and the host bindings.
#[derive(Error, Debug)]
pub enum UpdaterError {
    /// The configured API URL list is empty.
    #[error("No API Urls found in the settings.")]
    NoApiUrls,

    /// A metadata endpoint answered with a non-success status.
    #[error("API Url {url} returned a status code of {status}")]
    MetadataStatus {
        /// The endpoint that was queried.
        url: String,
        /// HTTP status code returned.
        status: u16,
    },

    /// The metadata body could not be parsed into an extension descriptor.
    #[error("Malformed metadata from {url}: {reason}")]
    MalformedMetadata {
        /// The endpoint that produced the body.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The metadata has no `download` field but an install was requested.
    #[error("Metadata for '{name}' has no download URL")]
    MissingDownloadUrl {
        /// Package name from the metadata.
        name: String,
    },

    /// The package download answered with a non-success status.
    #[error("Failed to fetch package - {name}")]
    PackageStatus {
        /// Package name from the metadata.
        name: String,
        /// HTTP status code returned.
        status: u16,
    },

    /// The package name cannot be used as a file name.
    #[error("Invalid package name '{name}': {reason}")]
    InvalidPackageName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Neither the storage directory nor a workspace folder accepted the package.
    #[error("No workspace folder available to write the file.")]
    NoWritableLocation,

    /// The editor launcher could not be located.
    #[error("Editor command '{command}' was not found in PATH")]
    EditorNotFound {
        /// The launcher name that was searched for.
        command: String,
    },

    /// The editor launcher exited unsuccessfully.
    #[error("Editor command failed: {operation}")]
    EditorCommandFailed {
        /// What was being attempted.
        operation: String,
        /// Captured stderr.
        stderr: String,
    },

    /// Transport-level HTTP failure.
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file syntax error.
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Catch-all.
    #[error("{message}")]
    Other {
        /// Human-readable message.
        message: String,
    },
}

/// An error with optional details and a suggestion, ready for display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The primary message.
    pub message: String,
    /// Actionable next step for the user.
    pub suggestion: Option<String>,
    /// Extra explanation.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into a user-facing [`ErrorContext`].
///
/// Known [`UpdaterError`] variants get tailored suggestions; everything else
/// keeps its full context chain as the message.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(updater_error) = error.downcast_ref::<UpdaterError>() {
        return match updater_error {
            UpdaterError::NoApiUrls => ErrorContext::new(updater_error.to_string())
                .with_suggestion("Add endpoints to `api_urls` in the config file (see `vsix-updater config path`)"),
            UpdaterError::EditorNotFound {
                command,
            } => ErrorContext::new(updater_error.to_string()).with_suggestion(format!(
                "Install the '{command}' shell command or set `editor_command` in the config file"
            )),
            UpdaterError::EditorCommandFailed {
                stderr,
                ..
            } => ErrorContext::new(updater_error.to_string()).with_details(stderr.trim().to_string()),
            UpdaterError::TomlParse(_) => ErrorContext::new(updater_error.to_string())
                .with_suggestion("Check the config file syntax with `vsix-updater config show`"),
            _ => ErrorContext::new(format!("{error:#}")),
        };
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(format!("{error:#}"))
                .with_suggestion("Check ownership of the updater directories or choose another `storage_dir`");
        }
    }

    ErrorContext::new(format!("{error:#}"))
}
