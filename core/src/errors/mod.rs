//! Domain-specific error types and error handling.

use thiserror::Error;

/// Input validation errors, raised before any provider call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid telephone number")]
    InvalidPhone,

    #[error("invalid pin code")]
    InvalidPin,
}

/// Session store and session content errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("fail to call session: {message}")]
    Store { message: String },

    #[error("invalid requestID in this session")]
    InvalidRequestId,
}

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// Network or authentication failure talking to the provider
    #[error("verification provider unreachable: {message}")]
    ProviderTransport { message: String },

    /// The provider explicitly declined the number or the PIN
    #[error("verification rejected, status={status}, detail={detail}")]
    ProviderRejection { status: String, detail: String },

    /// The provider reports another request in flight for the same verification
    #[error("there is a concurrent verification request in-progress: {request_id}")]
    ProviderConflict { request_id: String },

    /// Any other provider error body
    #[error("fail to start verification, status={status}, detail={detail}")]
    Provider { status: String, detail: String },
}

impl DomainError {
    /// Whether the error is a server fault rather than a user-visible outcome
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DomainError::Session(_) | DomainError::ProviderTransport { .. } | DomainError::Provider { .. }
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests;
