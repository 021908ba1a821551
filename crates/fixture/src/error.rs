//! Fixture setup errors
//!
//! Everything that can go wrong while preparing a test database: reading
//! the fixture directory or a file, parsing it, a file with the wrong
//! shape, a bad configuration file, or a database error during cleaning or
//! inserting. Any of these aborts the setup.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for fixture operations
pub type FixtureResult<T> = std::result::Result<T, FixtureError>;

/// Error types for fixture setup
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Directory or file could not be read
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid JSON / YAML
    #[error("Failed to parse fixture '{}': {message}", .path.display())]
    Parse {
        /// Fixture file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// File parsed but is not a sequence of documents
    #[error("Invalid fixture '{}': {reason}", .path.display())]
    Invalid {
        /// Fixture file
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database operation failed during cleaning or loading
    #[error("Database error: {0}")]
    Database(#[from] mockmongo_core::Error),
}

impl FixtureError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FixtureError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        FixtureError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        FixtureError::Invalid {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
