//! Per-request session store backed by the session registry.

use async_trait::async_trait;
use portal_gate_admission::{SessionError, SessionStore, SessionUser};
use portal_gate_core::{Result, SessionId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

use crate::client::TokenValidator;
use crate::session::{Session, SessionRegistry};

/// Session store scoped to one request and its session cookie.
///
/// The cached user starts empty for every request; `retrieve_user` fills it
/// from the registry. After the gate has run, the host inspects
/// [`issued_session`](Self::issued_session) and [`signed_off`](Self::signed_off)
/// to update the cookie.
pub struct CookieSessionStore {
    registry: Arc<SessionRegistry>,
    validator: Arc<dyn TokenValidator>,
    cookie: Option<SessionId>,
    default_email_domain: Option<String>,
    cached: RwLock<Option<SessionUser>>,
    issued: RwLock<Option<Session>>,
    signed_off: AtomicBool,
}

impl CookieSessionStore {
    /// Creates a store for a request carrying `cookie`, if any.
    #[must_use]
    pub fn new(
        registry: Arc<SessionRegistry>,
        validator: Arc<dyn TokenValidator>,
        cookie: Option<SessionId>,
    ) -> Self {
        Self {
            registry,
            validator,
            cookie,
            default_email_domain: None,
            cached: RwLock::new(None),
            issued: RwLock::new(None),
            signed_off: AtomicBool::new(false),
        }
    }

    /// Sets the domain used to synthesize email addresses during onboarding.
    #[must_use]
    pub fn with_default_email_domain(mut self, domain: Option<String>) -> Self {
        self.default_email_domain = domain;
        self
    }

    /// Returns the session created by a token exchange during this request.
    #[must_use]
    pub fn issued_session(&self) -> Option<Session> {
        self.issued
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns true if this request signed the user off.
    #[must_use]
    pub fn signed_off(&self) -> bool {
        self.signed_off.load(Ordering::Acquire)
    }

    fn cache(&self, user: Option<SessionUser>) {
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = user;
    }
}

#[async_trait]
impl SessionStore for CookieSessionStore {
    fn current_user(&self) -> Option<SessionUser> {
        self.cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn sign_off(&self) -> Result<(), SessionError> {
        if let Some(id) = self.cookie {
            self.registry.remove(id);
        }
        if let Some(session) = self
            .issued
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            self.registry.remove(session.id());
        }
        self.signed_off.store(true, Ordering::Release);
        debug!("signed off");
        Ok(())
    }

    fn clear_local(&self) {
        self.cache(None);
    }

    async fn retrieve_user(&self) -> Result<SessionUser, SessionError> {
        let id = self.cookie.ok_or(SessionError::NoSession)?;
        let session = self.registry.find(id)?;
        let user = session.user().clone();
        self.cache(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in_by_token(&self, token: &str) -> Result<SessionUser, SessionError> {
        let idp_user = self
            .validator
            .validate_token(token)
            .await
            .map_err(SessionError::from)?;

        let user = idp_user.into_session_user(self.default_email_domain.as_deref());
        let session = self.registry.create(user.clone());
        info!(
            username = user.username(),
            session_id = %session.id(),
            "session established from identity provider token"
        );

        *self.issued.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        self.cache(Some(user.clone()));
        Ok(user)
    }
}
