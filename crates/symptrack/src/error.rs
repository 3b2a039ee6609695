//! Error types for symptrack.
//!
//! This module defines all error types used throughout the symptrack crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for symptrack operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// Reading a key from the store failed.
    #[error("failed to read '{key}' from storage: {message}")]
    StorageRead {
        /// The storage key being read.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    /// Writing a key to the store failed.
    #[error("failed to write '{key}' to storage: {message}")]
    StorageWrite {
        /// The storage key being written.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    /// A persisted record could not be decoded.
    #[error("corrupt record under '{key}': {source}")]
    CorruptRecord {
        /// The storage key holding the record.
        key: String,
        /// The underlying decoding error.
        #[source]
        source: serde_json::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Domain Errors ===
    /// The catalog definition is unusable.
    #[error("invalid catalog: {message}")]
    InvalidCatalog {
        /// Description of the problem.
        message: String,
    },

    /// A custom symptom name was rejected.
    #[error("invalid custom symptom '{name}': {reason}")]
    InvalidCustomSymptom {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A question index is outside the active survey.
    #[error("no question at index {index} (survey has {len} questions)")]
    QuestionOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of questions available.
        len: usize,
    },

    /// An event was not valid for the current screen state.
    #[error("cannot handle {event} while {state}")]
    InvalidTransition {
        /// Name of the current state.
        state: &'static str,
        /// Name of the rejected event.
        event: &'static str,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for symptrack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a storage read error for the given key.
    #[must_use]
    pub fn storage_read(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageRead {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a storage write error for the given key.
    #[must_use]
    pub fn storage_write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageWrite {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an invalid custom symptom error.
    #[must_use]
    pub fn invalid_custom_symptom(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCustomSymptom {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid catalog error.
    #[must_use]
    pub fn invalid_catalog(message: impl Into<String>) -> Self {
        Self::InvalidCatalog {
            message: message.into(),
        }
    }

    /// Check if this error came from a failed write.
    #[must_use]
    pub fn is_write_failure(&self) -> bool {
        matches!(self, Self::StorageWrite { .. })
    }

    /// Check if this error is a corrupt persisted record.
    #[must_use]
    pub fn is_corrupt_record(&self) -> bool {
        matches!(self, Self::CorruptRecord { .. })
    }
}
