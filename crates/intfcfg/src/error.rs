//! Error types for interface reconciliation.

use std::io;
use std::path::PathBuf;

use sonic_restcfg_common::RestCfgError;
use thiserror::Error;

/// Result type alias for intfcfg operations.
pub type IntfCfgResult<T> = Result<T, IntfCfgError>;

/// Errors that can occur while reconciling interfaces.
#[derive(Debug, Error)]
pub enum IntfCfgError {
    /// The management interface appeared in the desired state.
    #[error("Management interface should not be configured: '{name}'")]
    ManagementInterface {
        /// The offending interface name.
        name: String,
    },

    /// The same interface name appeared twice in one collection.
    #[error("Duplicate interface '{name}'")]
    DuplicateInterface {
        /// The duplicated interface name.
        name: String,
    },

    /// A field held a value outside its domain.
    #[error("Invalid value for {field}: '{value}'")]
    InvalidValue {
        /// The field being parsed.
        field: String,
        /// The rejected value.
        value: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// Failed to read an input file.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Failed to parse an input file.
    #[error("Failed to parse '{}': {message}", path.display())]
    Parse {
        /// The file that could not be parsed.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// The device REST interface failed.
    #[error(transparent)]
    Rest(#[from] RestCfgError),
}

impl IntfCfgError {
    /// Creates an invalid value error.
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Returns the transport status code when the device rejected a request.
    pub fn code(&self) -> Option<u16> {
        match self {
            IntfCfgError::Rest(e) => e.code(),
            _ => None,
        }
    }
}
