//! # Error Handling
//!
//! This module defines the centralized error type for `ra-tuner`. It uses the
//! `thiserror` library to derive a single `Error` enum covering the failure
//! modes of a reconciliation run, together with a `Result<T>` alias used
//! throughout the library.
//!
//! The variants fall into two groups:
//!
//! - **Directory Service failures**: `Lookup`, `Write` and `Commit`. A `Write`
//!   error is scoped to one object and the engine records it and moves on;
//!   `Commit` is fatal for the whole run.
//! - **Input failures**: `ConfigParse` for invalid tuning files or topology
//!   snapshots, plus wrapped `Io`, `Yaml`, `Json` and `Regex` errors.

use thiserror::Error;

/// Main error type for ra-tuner operations
#[derive(Error, Debug)]
pub enum Error {
    /// An expected object, property or argument field does not exist.
    #[error("Lookup error: {target} - {message}")]
    Lookup { target: String, message: String },

    /// The Directory Service rejected a mutation.
    #[error("Write rejected for {target}: {message}")]
    Write { target: String, message: String },

    /// Persisting the staged session failed.
    ///
    /// The persisted state after this error is either the state before the
    /// run or partially updated; callers must treat the run as failed.
    #[error("Commit failed: {message}")]
    Commit { message: String },

    /// A tuning file or topology snapshot is structurally valid YAML but
    /// carries invalid content.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    /// Shorthand for a [`Error::ConfigParse`] without a hint.
    pub fn config(message: impl Into<String>) -> Self {
        Error::ConfigParse {
            message: message.into(),
            hint: None,
        }
    }

    /// Returns true for errors that are scoped to a single object and must
    /// not abort the remaining reconciliation.
    pub fn is_item_scoped(&self) -> bool {
        matches!(self, Error::Lookup { .. } | Error::Write { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
