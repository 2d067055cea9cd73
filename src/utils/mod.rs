//! Shared utilities: file writes, cross-process locks and progress indicators.

pub mod fs;
pub mod lock;
pub mod progress;

pub use fs::{FileContent, atomic_write, ensure_dir, normalize_host_path, write_file};
pub use lock::FileLock;
