//! Core error types shared by every layer.

pub mod error;

pub use error::{ErrorContext, UpdaterError, user_friendly_error};
