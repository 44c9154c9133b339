//! Session cookie handling.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use portal_gate_core::SessionId;
use portal_gate_sso::CookieSessionStore;
use time::Duration as TimeDuration;

use crate::config::SessionConfig;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session";

/// Reads the session id from the cookie jar.
///
/// A tampered or stale cookie value counts as no session.
#[must_use]
pub fn session_cookie(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}

/// Mirrors what the gate did to the session onto the cookie jar.
///
/// A session issued by a token exchange is set; a sign-off without a new
/// session removes the cookie.
#[must_use]
pub fn apply_session_changes(
    jar: CookieJar,
    store: &CookieSessionStore,
    config: &SessionConfig,
) -> CookieJar {
    if let Some(session) = store.issued_session() {
        let cookie = Cookie::build((SESSION_COOKIE, session.id().to_string()))
            .path("/")
            .http_only(true)
            .secure(config.secure_cookies)
            .same_site(SameSite::Lax)
            .max_age(TimeDuration::minutes(config.duration_minutes));
        return jar.add(cookie);
    }

    if store.signed_off() {
        let removal = Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .max_age(TimeDuration::ZERO);
        return jar.add(removal);
    }

    jar
}
