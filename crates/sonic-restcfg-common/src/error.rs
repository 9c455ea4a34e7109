//! Error types for REST configuration operations.
//!
//! This module defines the error types used throughout the restcfg crates.
//! All errors implement `std::error::Error` via `thiserror`.

use thiserror::Error;

/// Result type alias for restcfg operations.
pub type RestCfgResult<T> = Result<T, RestCfgError>;

/// Errors that can occur while talking to the device REST interface.
#[derive(Debug, Error)]
pub enum RestCfgError {
    /// The device could not be reached, or answered with an error status.
    #[error("Connection error (code {code}): {message}")]
    Connection {
        /// HTTP status code, or 0 when no response was received.
        code: u16,
        /// Error message reported by the transport or the device.
        message: String,
    },

    /// The device answered with a body that does not match the expected schema.
    #[error("Unexpected response for '{path}': {message}")]
    Schema {
        /// The request path that produced the response.
        path: String,
        /// Error message.
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl RestCfgError {
    /// Creates a connection error.
    pub fn connection(code: u16, message: impl Into<String>) -> Self {
        Self::Connection {
            code,
            message: message.into(),
        }
    }

    /// Creates a schema error.
    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the transport status code for connection errors.
    pub fn code(&self) -> Option<u16> {
        match self {
            RestCfgError::Connection { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RestCfgError {
    fn from(err: reqwest::Error) -> Self {
        let code = err.status().map(|s| s.as_u16()).unwrap_or(0);
        Self::Connection {
            code,
            message: err.to_string(),
        }
    }
}
