//! Admission gate for the portal login routes.
//!
//! The gate runs before a protected navigation and resolves it to exactly one
//! [`AdmissionDecision`]:
//! - signed-out requests are sent to the identity provider login page
//! - users with a cached or retrievable session are bounced to the default route
//! - local-auth deployments admit the navigation so the login form can render
//! - SSO deployments exchange a `token=` from the URL or redirect to the provider
//!
//! All collaborators (session storage, configuration, navigation and user
//! notification) are consumed through the traits in [`collaborator`].
//!
//! # Example
//!
//! ```
//! use portal_gate_admission::{AppConfig, AuthMode, NavigationRequest};
//!
//! let config = AppConfig::new(AuthMode::Sso, "https://idp.example", "harbor");
//! assert_eq!(config.login_url(), "https://idp.example/#/login?service=harbor");
//!
//! let request = NavigationRequest::new("/login?token=abc123");
//! assert_eq!(request.sso_token(), Some("abc123"));
//! assert!(!request.signout_requested());
//! ```

pub mod collaborator;
pub mod error;
pub mod gate;
pub mod refresh;
pub mod types;

pub use collaborator::{ConfigProvider, Navigator, Notifier, SessionStore};
pub use error::{ConfigError, SessionError};
pub use gate::{AdmissionGate, DEFAULT_AUTHENTICATED_ROUTE, Evaluation};
pub use refresh::{ConfigRefresh, RefreshOutcome};
pub use types::{AdmissionDecision, AppConfig, AuthMode, NavigationRequest, SessionUser};
