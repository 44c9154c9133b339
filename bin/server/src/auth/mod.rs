//! Authentication module for the portal-gate server.
//!
//! This module provides:
//! - the shared application state the gate is built from
//! - session cookie handling
//! - the guarded login routes
//!
//! A fresh [`AdmissionGate`] is assembled per request: the session store is
//! scoped to the request's cookie, while configuration, notification and the
//! session registry are shared.

pub mod middleware;
pub mod routes;

use portal_gate_admission::{AdmissionGate, ConfigProvider};
use portal_gate_core::SessionId;
use portal_gate_sso::{CookieSessionStore, SessionRegistry, TokenValidator};
use std::sync::Arc;

use crate::config::SessionConfig;
use crate::navigator::BannerNotifier;

pub use middleware::SESSION_COOKIE;
pub use routes::{home, login, login_child, router};

/// Shared application state.
pub struct AppState {
    /// Live server-side sessions.
    pub registry: Arc<SessionRegistry>,
    /// Identity provider token validation.
    pub validator: Arc<dyn TokenValidator>,
    /// Application configuration source.
    pub config: Arc<dyn ConfigProvider>,
    /// Pending user notifications.
    pub notifier: Arc<BannerNotifier>,
    /// Session configuration.
    pub session_config: SessionConfig,
    /// Where authenticated users are sent.
    pub default_route: String,
    /// Domain used to synthesize email addresses during onboarding.
    pub default_email_domain: Option<String>,
}

impl AppState {
    /// Creates a session store for a request carrying `cookie`.
    #[must_use]
    pub fn session_store(&self, cookie: Option<SessionId>) -> CookieSessionStore {
        CookieSessionStore::new(self.registry.clone(), self.validator.clone(), cookie)
            .with_default_email_domain(self.default_email_domain.clone())
    }

    /// Creates the gate for one request.
    #[must_use]
    pub fn gate(&self, sessions: Arc<CookieSessionStore>) -> AdmissionGate {
        AdmissionGate::new(sessions, self.config.clone(), self.notifier.clone())
            .with_default_route(self.default_route.clone())
    }
}
