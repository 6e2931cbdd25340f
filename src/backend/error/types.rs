/**
 * Backend Error Types
 *
 * `BackendError` carries enough context to be reported in two places: as
 * an HTTP status with a JSON body, and as the `message` of an `error`
 * event sent back to the originating connection.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::sessions::AuthError;
use crate::shared::SharedError;

/// Message shown to clients for any infrastructure failure
pub const SERVER_ERROR_MESSAGE: &str = "server error";

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Missing, invalid or expired credential
    #[error("Authentication error: {0}")]
    Unauthorized(#[from] AuthError),

    /// Input rejected before touching any store
    #[error("Validation error in field '{field}': {message}")]
    Validation {
        /// The offending field
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// The caller may not act on this resource
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Human-readable error message
        message: String,
    },

    /// The referenced message or user does not exist
    #[error("Not found: {what}")]
    NotFound {
        /// What was looked up
        what: String,
    },

    /// Postgres failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Any other store failure
    #[error("Storage error: {message}")]
    Storage {
        /// Human-readable error message
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// True for failures of the server rather than of the request
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Storage { .. } | Self::SerializationError(_)
        )
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Unauthorized` - 401
    /// - `Validation` - 400
    /// - `Forbidden` - 403
    /// - `NotFound` - 404
    /// - infrastructure - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Storage { .. } | Self::SerializationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text reported to the client
    ///
    /// Infrastructure details stay in the server log.
    pub fn client_message(&self) -> String {
        match self {
            Self::Unauthorized(err) => err.to_string(),
            Self::Validation { message, .. } => message.clone(),
            Self::Forbidden { message } => message.clone(),
            Self::NotFound { what } => format!("{} not found", what),
            Self::Database(_) | Self::Storage { .. } | Self::SerializationError(_) => {
                SERVER_ERROR_MESSAGE.to_string()
            }
        }
    }
}

impl From<SharedError> for BackendError {
    fn from(err: SharedError) -> Self {
        match err {
            SharedError::ValidationError { field, message } => Self::Validation { field, message },
            SharedError::SerializationError { message } => Self::validation("event", message),
            other @ SharedError::UnknownValue { .. } => Self::storage(other.to_string()),
        }
    }
}
