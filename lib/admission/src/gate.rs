//! The admission decision engine.
//!
//! One pass per navigation, in strict order:
//! 1. capture the cached configuration and start a background refresh
//! 2. `signout` requested: sign off, then leave for the provider login page
//! 3. user already cached: bounce to the default route
//! 4. persisted session retrievable: bounce to the default route
//! 5. local auth: admit; SSO: exchange the URL token or leave for the provider
//!
//! Every collaborator failure is absorbed into a decision.

use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use crate::collaborator::{ConfigProvider, Navigator, Notifier, SessionStore};
use crate::refresh::ConfigRefresh;
use crate::types::{AdmissionDecision, AppConfig, AuthMode, NavigationRequest};

/// Landing route for users who already hold a session.
pub const DEFAULT_AUTHENTICATED_ROUTE: &str = "/harbor/default";

/// A decision together with the refresh it started.
#[derive(Debug)]
pub struct Evaluation {
    pub decision: AdmissionDecision,
    pub refresh: ConfigRefresh,
}

/// Guard for the login routes and their children.
///
/// Cheap to clone; all collaborators are shared.
#[derive(Clone)]
pub struct AdmissionGate {
    sessions: Arc<dyn SessionStore>,
    config: Arc<dyn ConfigProvider>,
    notifier: Arc<dyn Notifier>,
    default_route: String,
}

impl AdmissionGate {
    /// Creates a gate redirecting authenticated users to
    /// [`DEFAULT_AUTHENTICATED_ROUTE`].
    #[must_use]
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        config: Arc<dyn ConfigProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            sessions,
            config,
            notifier,
            default_route: DEFAULT_AUTHENTICATED_ROUTE.to_string(),
        }
    }

    /// Sets the route authenticated users are sent to.
    #[must_use]
    pub fn with_default_route(mut self, route: impl Into<String>) -> Self {
        self.default_route = route.into();
        self
    }

    /// Returns the route authenticated users are sent to.
    #[must_use]
    pub fn default_route(&self) -> &str {
        &self.default_route
    }

    /// Decides a navigation. The background refresh keeps running detached.
    pub async fn decide(&self, request: &NavigationRequest) -> AdmissionDecision {
        self.evaluate(request).await.decision
    }

    /// Decides a nested child-route navigation.
    ///
    /// Identical to [`decide`](Self::decide); nothing is remembered between
    /// the parent and its children.
    pub async fn decide_child(&self, request: &NavigationRequest) -> AdmissionDecision {
        self.decide(request).await
    }

    /// Decides a navigation and returns the handle of the refresh it started.
    #[instrument(skip(self, request), fields(target = %request.target_url()))]
    pub async fn evaluate(&self, request: &NavigationRequest) -> Evaluation {
        let snapshot = self.config.current();
        let refresh = ConfigRefresh::spawn(Arc::clone(&self.config), Arc::clone(&self.notifier));

        let decision = self.resolve(request, &snapshot).await;
        debug!(decision = decision.kind(), "admission decided");

        Evaluation { decision, refresh }
    }

    /// Decides a navigation and performs the resulting redirect.
    ///
    /// Returns whether the original navigation may proceed.
    pub async fn guard(&self, request: &NavigationRequest, navigator: &dyn Navigator) -> bool {
        self.decide(request).await.dispatch(navigator)
    }

    /// Child-route variant of [`guard`](Self::guard).
    pub async fn guard_child(
        &self,
        request: &NavigationRequest,
        navigator: &dyn Navigator,
    ) -> bool {
        self.decide_child(request).await.dispatch(navigator)
    }

    async fn resolve(&self, request: &NavigationRequest, config: &AppConfig) -> AdmissionDecision {
        if request.signout_requested() {
            return self.sign_out(config).await;
        }

        if self.sessions.current_user().is_some() {
            return self.home();
        }

        match self.sessions.retrieve_user().await {
            Ok(user) => {
                debug!(username = user.username(), "session retrieved");
                return self.home();
            }
            Err(e) => debug!(error = %e, "no retrievable session"),
        }

        if config.auth_mode() != AuthMode::Sso {
            return AdmissionDecision::Admit;
        }

        let Some(token) = request.sso_token() else {
            return AdmissionDecision::RedirectExternal(config.login_url());
        };

        match self.sessions.sign_in_by_token(token).await {
            Ok(user) => {
                info!(username = user.username(), "signed in with identity provider token");
                self.home()
            }
            Err(e) => {
                info!(error = %e, "token exchange rejected");
                AdmissionDecision::RedirectExternal(config.login_url())
            }
        }
    }

    async fn sign_out(&self, config: &AppConfig) -> AdmissionDecision {
        match self.sessions.sign_off().await {
            Ok(()) => {
                self.sessions.clear_local();
                AdmissionDecision::RedirectExternal(config.login_url())
            }
            Err(e) => {
                error!(error = %e, "sign-off failed");
                AdmissionDecision::Deny
            }
        }
    }

    fn home(&self) -> AdmissionDecision {
        AdmissionDecision::RedirectInternal(self.default_route.clone())
    }
}
