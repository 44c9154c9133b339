//! Interfaces the gate consumes.
//!
//! The gate owns none of this state. Hosts supply implementations: the
//! server uses a cookie-scoped session store, a file/env backed config
//! provider, and a navigator that turns decisions into HTTP responses.

use async_trait::async_trait;
use portal_gate_core::Result;

use crate::error::{ConfigError, SessionError};
use crate::types::{AppConfig, SessionUser};

/// Holds the current user and talks to whatever backs the session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the cached user without any I/O.
    fn current_user(&self) -> Option<SessionUser>;

    /// Terminates the remote session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing session could not be terminated.
    async fn sign_off(&self) -> Result<(), SessionError>;

    /// Drops the cached user. Idempotent.
    fn clear_local(&self);

    /// Re-hydrates the user from a persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if no valid persisted session exists.
    async fn retrieve_user(&self) -> Result<SessionUser, SessionError>;

    /// Exchanges a one-time identity provider token for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is invalid or expired.
    async fn sign_in_by_token(&self, token: &str) -> Result<SessionUser, SessionError>;
}

/// Source of the application configuration.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Returns the cached configuration.
    fn current(&self) -> AppConfig;

    /// Reloads the configuration and replaces the cached copy on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration could not be reloaded; the
    /// cached copy is left untouched.
    async fn refresh(&self) -> Result<AppConfig, ConfigError>;
}

/// Performs the navigation a decision calls for.
pub trait Navigator: Send + Sync {
    /// Moves to a route inside the application.
    fn go_to(&self, route: &str);

    /// Leaves the application for an external URL.
    fn redirect_external(&self, url: &str);
}

/// Raises a notification the user has to acknowledge.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}
