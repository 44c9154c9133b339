//! Data model consumed and produced by the admission gate.

use portal_gate_core::UserId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::collaborator::Navigator;

/// Query parameter that requests a sign-out before anything else.
const SIGNOUT_PARAM: &str = "signout";

/// Marker preceding the one-time identity provider token in a URL.
const TOKEN_MARKER: &str = "token=";

/// A single navigation attempt handed to the gate by the routing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// Full target URL including any query string.
    target_url: String,
    /// Parsed query parameters of the target.
    query_params: HashMap<String, String>,
}

impl NavigationRequest {
    /// Creates a request for the given target URL with no query parameters.
    #[must_use]
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            query_params: HashMap::new(),
        }
    }

    /// Sets the parsed query parameters.
    #[must_use]
    pub fn with_query_params(mut self, query_params: HashMap<String, String>) -> Self {
        self.query_params = query_params;
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    /// Returns the full target URL.
    #[must_use]
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// Returns the parsed query parameters.
    #[must_use]
    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    /// Returns true if the `signout` parameter is present with a non-empty value.
    #[must_use]
    pub fn signout_requested(&self) -> bool {
        self.query_params
            .get(SIGNOUT_PARAM)
            .is_some_and(|value| !value.is_empty())
    }

    /// Returns everything after the first `token=` in the target URL.
    ///
    /// The remainder is taken verbatim up to the end of the URL, so a token
    /// followed by further parameters carries them along.
    #[must_use]
    pub fn sso_token(&self) -> Option<&str> {
        self.target_url
            .split_once(TOKEN_MARKER)
            .map(|(_, token)| token)
    }
}

/// How users authenticate to the portal.
///
/// Deserializes from the deployment's auth mode name: `angel_auth`, `sso_auth`
/// or `sso` select single sign-on; every other name is a local login flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum AuthMode {
    /// Single sign-on through the external identity provider.
    #[serde(rename = "sso_auth")]
    Sso,
    /// Any locally rendered login flow (database, LDAP, ...).
    #[default]
    Local,
}

impl AuthMode {
    /// Resolves an auth mode name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        const SSO_NAMES: [&str; 3] = ["angel_auth", "sso_auth", "sso"];

        let name = name.trim();
        if SSO_NAMES.iter().any(|sso| name.eq_ignore_ascii_case(sso)) {
            Self::Sso
        } else {
            Self::Local
        }
    }
}

impl From<String> for AuthMode {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

/// Application configuration snapshot read by the gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Authentication mode of the deployment.
    #[serde(default)]
    auth_mode: AuthMode,
    /// Base URL of the identity provider.
    #[serde(default)]
    sso_endpoint: String,
    /// Service identifier passed back to the identity provider.
    #[serde(default)]
    sso_redirect_target: String,
}

impl AppConfig {
    /// Creates a configuration snapshot.
    #[must_use]
    pub fn new(
        auth_mode: AuthMode,
        sso_endpoint: impl Into<String>,
        sso_redirect_target: impl Into<String>,
    ) -> Self {
        Self {
            auth_mode,
            sso_endpoint: sso_endpoint.into(),
            sso_redirect_target: sso_redirect_target.into(),
        }
    }

    /// Returns the authentication mode.
    #[must_use]
    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    /// Returns the identity provider base URL.
    #[must_use]
    pub fn sso_endpoint(&self) -> &str {
        &self.sso_endpoint
    }

    /// Returns the service identifier registered with the identity provider.
    #[must_use]
    pub fn sso_redirect_target(&self) -> &str {
        &self.sso_redirect_target
    }

    /// Returns the identity provider login page URL.
    #[must_use]
    pub fn login_url(&self) -> String {
        format!(
            "{}/#/login?service={}",
            self.sso_endpoint, self.sso_redirect_target
        )
    }
}

/// The authenticated user held by a session store.
///
/// The gate only checks whether one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    id: UserId,
    username: String,
    email: Option<String>,
    display_name: Option<String>,
}

impl SessionUser {
    /// Creates a user with a freshly generated id.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            email: None,
            display_name: None,
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = display_name;
        self
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}

/// Outcome of one admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// Let the requested navigation proceed.
    Admit,
    /// Block the navigation without redirecting anywhere.
    Deny,
    /// Block the navigation and move to an application route.
    RedirectInternal(String),
    /// Block the navigation and leave the application for this URL.
    RedirectExternal(String),
}

impl AdmissionDecision {
    /// Returns true if the original navigation may proceed.
    #[must_use]
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admit)
    }

    /// Short label used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Admit => "admit",
            Self::Deny => "deny",
            Self::RedirectInternal(_) => "redirect_internal",
            Self::RedirectExternal(_) => "redirect_external",
        }
    }

    /// Performs the navigation this decision calls for.
    ///
    /// Returns whether the original navigation is admitted.
    pub fn dispatch(&self, navigator: &dyn Navigator) -> bool {
        match self {
            Self::Admit => true,
            Self::Deny => false,
            Self::RedirectInternal(route) => {
                navigator.go_to(route);
                false
            }
            Self::RedirectExternal(url) => {
                navigator.redirect_external(url);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_url_concatenates_endpoint_and_service() {
        let config = AppConfig::new(AuthMode::Sso, "https://idp.example", "harbor");
        assert_eq!(
            config.login_url(),
            "https://idp.example/#/login?service=harbor"
        );
    }

    #[test]
    fn sso_token_takes_rest_of_url() {
        let request = NavigationRequest::new("/login?token=abc123&lang=en");
        assert_eq!(request.sso_token(), Some("abc123&lang=en"));
    }

    #[test]
    fn sso_token_absent() {
        let request = NavigationRequest::new("/login?redirect_url=%2Fprojects");
        assert_eq!(request.sso_token(), None);
    }

    #[test]
    fn empty_signout_value_is_not_a_signout() {
        let request = NavigationRequest::new("/login?signout=").with_query_param("signout", "");
        assert!(!request.signout_requested());

        let request = request.with_query_param("signout", "true");
        assert!(request.signout_requested());
    }

    #[test]
    fn auth_mode_accepts_provider_names() {
        let sso: AuthMode = serde_json::from_str("\"sso_auth\"").expect("deserialize");
        assert_eq!(sso, AuthMode::Sso);
        let short: AuthMode = serde_json::from_str("\"sso\"").expect("deserialize");
        assert_eq!(short, AuthMode::Sso);
        let angel: AuthMode = serde_json::from_str("\"angel_auth\"").expect("deserialize");
        assert_eq!(angel, AuthMode::Sso);
        assert_eq!(AuthMode::from_name("Angel_Auth"), AuthMode::Sso);
        let db: AuthMode = serde_json::from_str("\"db_auth\"").expect("deserialize");
        assert_eq!(db, AuthMode::Local);
        let ldap: AuthMode = serde_json::from_str("\"ldap_auth\"").expect("deserialize");
        assert_eq!(ldap, AuthMode::Local);
    }

    #[test]
    fn auth_mode_serializes_provider_name() {
        let json = serde_json::to_string(&AuthMode::Sso).expect("serialize");
        assert_eq!(json, "\"sso_auth\"");
        assert_eq!(AuthMode::from_name(" SSO_AUTH "), AuthMode::Sso);
    }

    #[test]
    fn app_config_deserializes_with_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"auth_mode": "sso_auth"}"#).expect("deserialize");
        assert_eq!(config.auth_mode(), AuthMode::Sso);
        assert_eq!(config.sso_endpoint(), "");
        assert_eq!(config.sso_redirect_target(), "");
    }

    #[test]
    fn only_admit_is_admitted() {
        assert!(AdmissionDecision::Admit.is_admitted());
        assert!(!AdmissionDecision::Deny.is_admitted());
        assert!(!AdmissionDecision::RedirectInternal("/".to_string()).is_admitted());
        assert!(!AdmissionDecision::RedirectExternal("https://idp".to_string()).is_admitted());
    }
}
