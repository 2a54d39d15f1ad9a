//! Error types used throughout the application

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::impl_domain_status_conversions;

/// Shared, cloneable handle to the original cause of a failure.
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// The bare classification of a [`SheetError`].
///
/// Every failure surfaced by the ledger maps to exactly one kind; the HTTP
/// boundary translates kinds into status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    AuthenticationFailed,
    PermissionDenied,
    SheetNotFound,
    ServiceUnavailable,
    InvalidRequest,
    OperationFailed,
}

impl_domain_status_conversions!(ErrorKind {
    AuthenticationFailed => "authentication_failed",
    PermissionDenied => "permission_denied",
    SheetNotFound => "sheet_not_found",
    ServiceUnavailable => "service_unavailable",
    InvalidRequest => "invalid_request",
    OperationFailed => "operation_failed",
});

impl ErrorKind {
    /// Upper-case wire code, e.g. `PERMISSION_DENIED`.
    pub fn code(self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "AUTHENTICATION_FAILED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::SheetNotFound => "SHEET_NOT_FOUND",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::OperationFailed => "OPERATION_FAILED",
        }
    }
}

/// Main error type for the order ledger
#[derive(Error, Debug, Clone)]
pub enum SheetError {
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    #[error("Permission denied: {message}")]
    PermissionDenied {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    #[error("Sheet not found: {message}")]
    SheetNotFound {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Operation failed: {message}")]
    OperationFailed {
        message: String,
        #[source]
        source: Option<Cause>,
    },
}

impl SheetError {
    pub fn authentication_failed(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::AuthenticationFailed { message: message.into(), source: Some(Arc::new(source)) }
    }

    pub fn permission_denied(message: impl Into<String>, source: Option<Cause>) -> Self {
        Self::PermissionDenied { message: message.into(), source }
    }

    pub fn sheet_not_found(message: impl Into<String>, source: Option<Cause>) -> Self {
        Self::SheetNotFound { message: message.into(), source }
    }

    pub fn service_unavailable(message: impl Into<String>, source: Option<Cause>) -> Self {
        Self::ServiceUnavailable { message: message.into(), source }
    }

    /// Caller-side validation failure; never retried.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest { message: message.into() }
    }

    pub fn operation_failed(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::OperationFailed { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthenticationFailed { .. } => ErrorKind::AuthenticationFailed,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::SheetNotFound { .. } => ErrorKind::SheetNotFound,
            Self::ServiceUnavailable { .. } => ErrorKind::ServiceUnavailable,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Self::OperationFailed { .. } => ErrorKind::OperationFailed,
        }
    }

    /// Human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::AuthenticationFailed { message, .. }
            | Self::PermissionDenied { message, .. }
            | Self::SheetNotFound { message, .. }
            | Self::ServiceUnavailable { message, .. }
            | Self::InvalidRequest { message }
            | Self::OperationFailed { message, .. } => message,
        }
    }

    /// The original cause, if one was captured.
    pub fn cause(&self) -> Option<&Cause> {
        match self {
            Self::AuthenticationFailed { source, .. }
            | Self::PermissionDenied { source, .. }
            | Self::SheetNotFound { source, .. }
            | Self::ServiceUnavailable { source, .. }
            | Self::OperationFailed { source, .. } => source.as_ref(),
            Self::InvalidRequest { .. } => None,
        }
    }

    /// Whether the cached service handle should be discarded after this
    /// failure.
    pub fn invalidates_handle(&self) -> bool {
        matches!(self.kind(), ErrorKind::AuthenticationFailed | ErrorKind::ServiceUnavailable)
    }
}

/// Failure reported by the remote spreadsheet transport, before
/// classification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {code}{}: {message}", .status.as_deref().map(|s| format!(" {s}")).unwrap_or_default())]
    Status { code: u16, status: Option<String>, message: String },

    /// The request never produced a response (connect, timeout, TLS).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response arrived but could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl RemoteError {
    /// HTTP status code, when the failure carried one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration file not found: {0}")]
    NotFound(String),
}

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, SheetError>;
