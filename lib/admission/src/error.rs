//! Error types reported by the gate's collaborators.
//!
//! Collaborators return these wrapped in a rootcause `Report`. The gate never
//! propagates them: each one is absorbed into an [`AdmissionDecision`](crate::AdmissionDecision).

use std::fmt;

/// Errors from session store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// There is no persisted session to re-hydrate.
    NoSession,
    /// The persisted session has expired.
    SessionExpired { session_id: String },
    /// The identity provider rejected the one-time token.
    InvalidToken { reason: String },
    /// The remote session could not be terminated.
    SignOffFailed { reason: String },
    /// The backing service could not be reached.
    Unavailable { reason: String },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSession => write!(f, "no session to retrieve"),
            Self::SessionExpired { session_id } => {
                write!(f, "session has expired: {session_id}")
            }
            Self::InvalidToken { reason } => write!(f, "invalid sign-in token: {reason}"),
            Self::SignOffFailed { reason } => write!(f, "sign-off failed: {reason}"),
            Self::Unavailable { reason } => write!(f, "session service unavailable: {reason}"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Errors from configuration refreshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration source could not be read.
    LoadFailed { reason: String },
    /// The configuration was read but does not describe a valid `AppConfig`.
    Invalid { reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadFailed { reason } => write!(f, "failed to load configuration: {reason}"),
            Self::Invalid { reason } => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}
