//! Configuration management.
//!
//! A single per-user TOML file holds the endpoint list and host settings. See
//! [`global`] for the file format and resolution rules.

pub mod global;

pub use global::{ScheduleConfig, UpdaterConfig, VersionPolicy, app_dir, check_lock_path_for, state_path_for};
