//! Identity provider connection settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the external identity provider.
///
/// Fields with defaults can be omitted when loading from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdpConfig {
    /// Identity provider address, with or without scheme and trailing slash.
    endpoint: String,
    /// Domain appended to usernames that carry no email address.
    #[serde(default)]
    default_email_domain: Option<String>,
    /// Timeout for token validation requests, in seconds.
    /// Default: 10
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl IdpConfig {
    /// Creates a configuration with defaults for optional fields.
    #[must_use]
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            default_email_domain: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Sets the domain used to synthesize email addresses.
    #[must_use]
    pub fn with_default_email_domain(mut self, domain: Option<String>) -> Self {
        self.default_email_domain = domain;
        self
    }

    /// Sets the request timeout in seconds.
    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Returns the endpoint as configured.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the endpoint with an `http://` scheme if none was given and a
    /// trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        let endpoint = self.endpoint.trim();
        let mut url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("http://{endpoint}")
        };
        if !url.ends_with('/') {
            url.push('/');
        }
        url
    }

    /// Returns the domain used to synthesize email addresses.
    #[must_use]
    pub fn default_email_domain(&self) -> Option<&str> {
        self.default_email_domain.as_deref()
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
