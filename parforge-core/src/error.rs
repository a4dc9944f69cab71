//! Error types for everything fallible outside the pure validator and
//! generator.
//!
//! Error messages never carry generated parameter text, so a connect string
//! or encryption password cannot leak through an error chain.

use thiserror::Error;

use crate::jobfile::JobFileError;

/// Main error type for parforge operations.
#[derive(Debug, Error)]
pub enum ParforgeError {
    /// Configuration or setup error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Validation found blocking errors, so nothing was generated
    #[error("Job has {error_count} blocking validation errors")]
    Blocked {
        error_count: usize,
        errors: Vec<String>,
    },

    /// The job file could not be loaded
    #[error("Invalid job file: {source}")]
    InvalidJobFile {
        #[from]
        source: JobFileError,
    },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with ParforgeError
pub type Result<T> = std::result::Result<T, ParforgeError>;

impl ParforgeError {
    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a blocked error from the validator's error list
    pub fn blocked(errors: Vec<String>) -> Self {
        Self::Blocked {
            error_count: errors.len(),
            errors,
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }
}
