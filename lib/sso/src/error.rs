//! Error types for identity provider calls.

use portal_gate_admission::SessionError;
use std::fmt;

/// Errors from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdpError {
    /// The provider rejected the token, or returned no user for it.
    InvalidToken { reason: String },
    /// The request could not be sent or the provider answered with an error status.
    Request { reason: String },
    /// The response body was not a validation response.
    MalformedResponse { reason: String },
}

impl fmt::Display for IdpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken { reason } => write!(f, "token rejected: {reason}"),
            Self::Request { reason } => write!(f, "identity provider request failed: {reason}"),
            Self::MalformedResponse { reason } => {
                write!(f, "malformed identity provider response: {reason}")
            }
        }
    }
}

impl std::error::Error for IdpError {}

impl From<IdpError> for SessionError {
    fn from(err: IdpError) -> Self {
        match err {
            IdpError::InvalidToken { reason } => Self::InvalidToken { reason },
            other => Self::Unavailable {
                reason: other.to_string(),
            },
        }
    }
}
