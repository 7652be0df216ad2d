//! Error model.

use thiserror::Error;

/// Result type used for local, deterministic validation.
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type returned by every remote collaborator call.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Domain-level error.
///
/// Keep this focused on input validation performed before any network call.
/// Transport concerns belong in [`GatewayError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. a required form field is empty).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. empty).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

/// Failure talking to the remote API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl GatewayError {
    /// Transport-level failure (the request may never have reached the API).
    pub fn is_network(&self) -> bool {
        matches!(self, GatewayError::Network(_))
    }
}
