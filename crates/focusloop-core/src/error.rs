//! Core error types for focusloop-core.
//!
//! Every external-input failure in the core has a defined fallback, so most of
//! these errors are logged and swallowed by the controller rather than
//! surfaced to the user. The ones that do surface are validation failures on
//! explicit user input and configuration problems in the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusloop-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Persistence-related errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Bad user input that is rejected rather than clamped.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Task title is empty after trimming whitespace
    #[error("Task title must not be empty")]
    EmptyTitle,

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Storage and snapshot failures.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Failed to open the key-value store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Read or write against the store failed
    #[error("Storage query failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),

    /// Store is locked by another writer
    #[error("Storage is locked")]
    Locked,

    /// Stored record could not be parsed
    #[error("Corrupt record '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Stored record parsed but violates an invariant
    #[error("Invalid record '{key}': {message}")]
    Invalid { key: String, message: String },

    /// Record could not be serialized
    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[source] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Notifier failures. Always swallowed by the controller.
#[derive(Error, Debug)]
#[error("Notification failed: {0}")]
pub struct NotifyError(pub String);

impl PersistenceError {
    /// Map a rusqlite failure, singling out lock contention.
    pub fn from_sqlite(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg)
                if inner.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                PersistenceError::Locked
            }
            _ => PersistenceError::QueryFailed(err),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
