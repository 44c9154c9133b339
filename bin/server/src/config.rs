//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from `GATE__`-prefixed environment variables
//! (for example `GATE__IDP__ENDPOINT`).
//!
//! The application configuration consumed by the gate itself is loaded
//! separately by [`PortalConfigProvider`](crate::provider::PortalConfigProvider)
//! because it is refreshed at runtime.

use portal_gate_admission::DEFAULT_AUTHENTICATED_ROUTE;
use portal_gate_sso::IdpConfig;
use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,

    /// Portal routing and application config source.
    #[serde(default)]
    pub portal: PortalConfig,

    /// Identity provider configuration.
    pub idp: IdpConfig,
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session duration in minutes.
    #[serde(default = "default_session_duration_minutes")]
    pub duration_minutes: i64,

    /// Interval between session cleanup runs, in seconds.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,

    /// Whether to set the Secure flag on cookies (requires HTTPS).
    /// Defaults to true; set to false for local HTTP development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,
}

fn default_session_duration_minutes() -> i64 {
    30
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

fn default_secure_cookies() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_minutes: default_session_duration_minutes(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
            secure_cookies: default_secure_cookies(),
        }
    }
}

/// Portal routing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// Optional file holding the application config (auth mode, SSO endpoint).
    /// `PORTAL__`-prefixed environment variables override it.
    #[serde(default)]
    pub config_file: Option<PathBuf>,

    /// Where authenticated users are sent.
    #[serde(default = "default_route")]
    pub default_route: String,
}

fn default_route() -> String {
    DEFAULT_AUTHENTICATED_ROUTE.to_string()
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            default_route: default_route(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("GATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
