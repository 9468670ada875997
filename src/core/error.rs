//! Error types for property bag operations
//!
//! Compound-path operations never produce these; they report absence through
//! their default results. Raw single-level accessors and deferred coercions
//! surface errors directly to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error kind a default policy raises instead of producing a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Generic bad value
    ValueError,
    /// Missing key
    KeyError,
    /// Wrong type for the operation
    TypeError,
    /// Failed lookup
    LookupError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ValueError => "ValueError",
            ErrorKind::KeyError => "KeyError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::LookupError => "LookupError",
        };
        f.write_str(name)
    }
}

/// Main error type for property bags
#[derive(Error, Debug)]
pub enum Error {
    /// Key absent at the exact level addressed
    #[error("No such key : {key}")]
    KeyNotFound {
        /// Key or dotted chain that was not found
        key: String,
    },

    /// A deferred placeholder was invoked as a function
    #[error("Not callable : {path}")]
    NotCallable {
        /// Dotted chain of the placeholder
        path: String,
    },

    /// A default policy configured as an error kind was triggered
    #[error("{kind}: No such key : {path}")]
    Configured {
        /// Configured error kind
        kind: ErrorKind,
        /// Dotted chain that was read
        path: String,
    },

    /// A concrete default could not be coerced to the requested type
    #[error("Cannot coerce default for {path} to {target}")]
    Coercion {
        /// Dotted chain that was read
        path: String,
        /// Requested target type
        target: &'static str,
    },

    /// Attribute navigation reached a value that is not a mapping
    #[error("Cannot read attribute '{key}' of a {found} value")]
    NotNavigable {
        /// Attribute that was requested
        key: String,
        /// Type name of the value found instead of a mapping
        found: &'static str,
    },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a key not found error
    pub fn key_not_found(key: impl fmt::Display) -> Self {
        Self::KeyNotFound {
            key: key.to_string(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Check if this is a key not found error
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound { .. })
    }

    /// Check if this error was raised by a default policy
    pub fn is_configured(&self) -> bool {
        matches!(self, Error::Configured { .. })
    }

    /// Configured error kind, if this error came from a default policy
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Configured { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
