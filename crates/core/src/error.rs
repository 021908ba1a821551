//! Error types for the mock document database
//!
//! This module defines the error type shared by the storage engine and the
//! async facades. We use `thiserror` for automatic `Display` and `Error`
//! trait implementations.
//!
//! Not-found conditions are never errors: lookups return `None` and deletes
//! of zero documents report a zero count.

use thiserror::Error;

/// Result type alias for mockmongo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the mock document database
#[derive(Debug, Error)]
pub enum Error {
    /// An option that a real driver accepts but the mock does not implement
    ///
    /// Distinguishes "feature not implemented" from invalid usage.
    #[error("Not implemented: {option}: {message}")]
    NotImplemented {
        /// Name of the unsupported option or operator
        option: &'static str,
        /// Human readable explanation
        message: String,
    },

    /// A document with the same `_id` already exists in the collection
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Document shape is not acceptable (e.g. `_id` of an unusable type)
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Invalid operation or argument
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a `NotImplemented` error for an option
    pub fn not_implemented(option: &'static str, message: impl Into<String>) -> Self {
        Error::NotImplemented {
            option,
            message: message.into(),
        }
    }

    /// Whether this error reports an unimplemented feature
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Error::NotImplemented { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
