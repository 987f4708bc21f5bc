//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, client-side failures (validation,
/// malformed values). Network and storage concerns have their own error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank required field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A monetary amount could not be parsed or was out of range.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// Failure talking to the remote marketplace API.
///
/// Defined here (not in the HTTP client) so the catalog/order seams can be
/// implemented by fakes without pulling in a transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response. `message` is the server's body, shown to the user verbatim.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// A 2xx response whose body did not match the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The call needs a session token and none is present.
    #[error("not authenticated")]
    Unauthenticated,
}

impl ApiError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Message suitable for direct display.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }
}
