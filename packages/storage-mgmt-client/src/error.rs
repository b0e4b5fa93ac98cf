//! Management client error types.

use std::fmt;

use storage_mgmt_core::config::ConfigError;
use thiserror::Error;

/// Category of a [`ManagementError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport failure: connect, timeout, body read
    Io,
    /// Response body could not be decoded
    Parse,
    /// Endpoint or request URI is malformed
    Uri,
    /// Configuration is missing or invalid
    Config,
    /// The service answered with a non-success status
    Service,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Io => "io",
            ErrorKind::Parse => "parse",
            ErrorKind::Uri => "uri",
            ErrorKind::Config => "config",
            ErrorKind::Service => "service",
        };
        f.write_str(name)
    }
}

/// Errors raised by management operations.
#[derive(Error, Debug)]
pub enum ManagementError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid URI '{uri}': {reason}")]
    Uri { uri: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Service returned {status} ({code}): {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
        request_id: Option<String>,
    },
}

impl ManagementError {
    /// The kind discriminator of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ManagementError::Io(_) => ErrorKind::Io,
            ManagementError::Parse(_) => ErrorKind::Parse,
            ManagementError::Uri { .. } => ErrorKind::Uri,
            ManagementError::Config(_) => ErrorKind::Config,
            ManagementError::Service { .. } => ErrorKind::Service,
        }
    }

    /// HTTP status of a service error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ManagementError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Request id reported with a service error.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            ManagementError::Service { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// Whether this is a service error with status 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ManagementError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ManagementError::Parse(err.to_string())
        } else if err.is_builder() {
            ManagementError::Uri {
                uri: err.url().map(|u| u.to_string()).unwrap_or_default(),
                reason: err.to_string(),
            }
        } else {
            ManagementError::Io(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ManagementError {
    fn from(err: serde_json::Error) -> Self {
        ManagementError::Parse(err.to_string())
    }
}

impl From<ConfigError> for ManagementError {
    fn from(err: ConfigError) -> Self {
        ManagementError::Config(err.to_string())
    }
}

/// Result alias for management operations.
pub type ManagementResult<T> = Result<T, ManagementError>;
