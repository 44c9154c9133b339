//! Server-side login sessions.
//!
//! Sessions are created after a successful token exchange and looked up by
//! the id carried in the session cookie. The table lives in memory; a
//! periodic `delete_expired` sweep keeps it bounded.

use chrono::{DateTime, Duration, Utc};
use portal_gate_admission::{SessionError, SessionUser};
use portal_gate_core::{Result, SessionId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// An authenticated login session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    user: SessionUser,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session for the user, valid for `ttl`.
    #[must_use]
    pub fn new(user: SessionUser, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            user,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the session has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// In-memory table of live sessions.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Session>>,
    ttl: Duration,
}

impl SessionRegistry {
    /// Creates an empty registry issuing sessions valid for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the lifetime of newly created sessions.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Creates and stores a session for the user.
    pub fn create(&self, user: SessionUser) -> Session {
        let session = Session::new(user, self.ttl);
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.id(), session.clone());
        debug!(session_id = %session.id(), "session created");
        session
    }

    /// Looks up a live session.
    ///
    /// # Errors
    ///
    /// Returns `NoSession` for unknown ids and `SessionExpired` for expired
    /// sessions, which are removed on the way out.
    pub fn find(&self, id: SessionId) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(SessionError::NoSession)?;

        if session.is_expired() {
            self.remove(id);
            return Err(SessionError::SessionExpired {
                session_id: id.to_string(),
            }
            .into());
        }

        Ok(session)
    }

    /// Removes a session. Returns whether it existed.
    pub fn remove(&self, id: SessionId) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some();
        if removed {
            debug!(session_id = %id, "session removed");
        }
        removed
    }

    /// Removes every expired session. Returns how many were removed.
    pub fn delete_expired(&self) -> usize {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        before - sessions.len()
    }

    /// Returns the number of stored sessions, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
