//! Shared Error Types
//!
//! Errors raised while building or decoding wire types. These are the
//! failures a client can cause without touching server state: malformed
//! frames, missing fields, content outside the accepted bounds.
//!
//! # Usage
//!
//! ```rust
//! use parley::shared::error::SharedError;
//!
//! let error = SharedError::validation("content", "content cannot be empty");
//! assert!(error.to_string().contains("content"));
//! ```
use thiserror::Error;

/// Errors that can occur while handling wire types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// A stored enum value that this build does not know about
    #[error("Unknown {kind} value: {value}")]
    UnknownValue {
        /// Which enum was being decoded
        kind: &'static str,
        /// The raw value
        value: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an unknown-value error
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            kind,
            value: value.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
