//! Constants shared across the updater.

use std::time::Duration;

/// Directory name under the user's home (or local data dir on Windows).
pub const APP_DIR_NAME: &str = ".vsix-updater";

/// Directory name used on Windows under `%LOCALAPPDATA%`.
pub const WINDOWS_APP_DIR_NAME: &str = "vsix-updater";

/// Configuration file name inside the app directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Persisted key/value state (ignore flags).
pub const STATE_FILE_NAME: &str = "state.json";

/// Lock file serialising checks across processes.
pub const CHECK_LOCK_FILE_NAME: &str = "check.lock";

/// Output-channel log file name.
pub const LOG_FILE_NAME: &str = "updater.log";

/// Default download directory name inside the app directory.
pub const DOWNLOADS_DIR_NAME: &str = "downloads";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "VSIX_UPDATER_CONFIG";

/// Environment variable disabling progress spinners.
pub const NO_PROGRESS_ENV_VAR: &str = "VSIX_UPDATER_NO_PROGRESS";

/// Default editor launcher.
pub const DEFAULT_EDITOR_COMMAND: &str = "code";

/// Package extension appended to bare package names.
pub const PACKAGE_EXTENSION: &str = "vsix";

/// Default lifetime of an ignore flag, in days.
pub const DEFAULT_IGNORE_TTL_DAYS: u64 = 30;

/// Background check cadence (top of every hour).
pub const BACKGROUND_CHECK_PERIOD: Duration = Duration::from_secs(60 * 60);

/// Title of the output channel, used as the log header and notification prefix.
pub const CHANNEL_TITLE: &str = "Extension Installer";

/// Prompt actions.
pub const ACTION_UPDATE: &str = "Update";
pub const ACTION_IGNORE: &str = "Ignore";
pub const ACTION_RELOAD: &str = "Reload window";

/// Suffix of persisted ignore-flag keys.
pub const IGNORE_KEY_SUFFIX: &str = "ignore";

/// Version segment used in ignore keys when the extension is not installed.
pub const NOT_INSTALLED_MARKER: &str = "not-installed";
