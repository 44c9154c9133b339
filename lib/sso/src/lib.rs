//! Single sign-on collaborators for the portal admission gate.
//!
//! This crate provides:
//! - `IdpClient`: validates one-time tokens against the identity provider
//! - `IdpUser`: the provider's user record and its onboarding into a `SessionUser`
//! - `SessionRegistry`: the server-side session table
//! - `CookieSessionStore`: a per-request `SessionStore` keyed by the session cookie
//!
//! # Example
//!
//! ```
//! use portal_gate_sso::IdpConfig;
//!
//! let config = IdpConfig::new("idp.example:8080/sso".to_string());
//! assert_eq!(config.base_url(), "http://idp.example:8080/sso/");
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod store;
pub mod user;

pub use client::{IdpClient, TokenValidator};
pub use config::IdpConfig;
pub use error::IdpError;
pub use session::{Session, SessionRegistry};
pub use store::CookieSessionStore;
pub use user::{IdpUser, ValidationResponse};
