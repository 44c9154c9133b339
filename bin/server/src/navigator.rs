//! Navigation and notification adapters for HTTP requests.

use axum::response::Redirect;
use portal_gate_admission::{Navigator, Notifier};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error};

/// Navigator that records where a request should be redirected.
///
/// In HTTP both kinds of navigation end up as a `303 See Other`; the
/// distinction only matters for logging.
#[derive(Debug, Default)]
pub struct ResponseNavigator {
    target: Mutex<Option<String>>,
}

impl ResponseNavigator {
    /// Returns the recorded redirect, if any.
    #[must_use]
    pub fn into_redirect(self) -> Option<Redirect> {
        self.target
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .map(|target| Redirect::to(&target))
    }

    fn record(&self, target: &str) {
        *self.target.lock().unwrap_or_else(PoisonError::into_inner) = Some(target.to_string());
    }
}

impl Navigator for ResponseNavigator {
    fn go_to(&self, route: &str) {
        debug!(route, "redirecting inside the portal");
        self.record(route);
    }

    fn redirect_external(&self, url: &str) {
        debug!(url, "redirecting to identity provider");
        self.record(url);
    }
}

/// Holds the notification shown on the next rendered login page.
///
/// The notice is portal-wide, not per client: the only notification is a
/// failed configuration reload, which affects every user. It is shown once,
/// on whichever login page renders next, regardless of which request
/// triggered the reload. A newer notice replaces an unshown one.
#[derive(Debug, Default)]
pub struct BannerNotifier {
    pending: Mutex<Option<String>>,
}

impl BannerNotifier {
    /// Takes the pending notification.
    pub fn take(&self) -> Option<String> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Notifier for BannerNotifier {
    fn notify(&self, message: &str) {
        error!(notice = message, "notifying user");
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.to_string());
    }
}
