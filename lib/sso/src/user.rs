//! Identity provider user records and their onboarding into portal users.

use portal_gate_admission::SessionUser;
use serde::{Deserialize, Serialize};

use crate::error::IdpError;

/// A user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdpUser {
    /// Provider-side numeric id.
    #[serde(default)]
    pub id: i64,
    /// Login name.
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

impl IdpUser {
    /// Converts the provider record into the portal's session user.
    ///
    /// Missing profile fields are filled in:
    /// - display name falls back to the nickname, then the username
    /// - email falls back to the username if it looks like an address, then
    ///   to `username@<default_email_domain>` when a domain is configured
    #[must_use]
    pub fn into_session_user(self, default_email_domain: Option<&str>) -> SessionUser {
        let display_name = non_empty(self.nickname).unwrap_or_else(|| self.username.clone());
        let email = non_empty(self.email).or_else(|| {
            if self.username.contains('@') {
                Some(self.username.clone())
            } else {
                default_email_domain.map(|domain| format!("{}@{domain}", self.username))
            }
        });

        SessionUser::new(self.username)
            .with_email(email)
            .with_display_name(Some(display_name))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Body of the provider's token validation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    #[serde(default)]
    pub code: i64,
    pub success: bool,
    #[serde(default)]
    pub data: Vec<IdpUser>,
}

impl ValidationResponse {
    /// Returns the validated user.
    ///
    /// # Errors
    ///
    /// Returns `InvalidToken` if validation did not succeed or no user was returned.
    pub fn into_user(self) -> Result<IdpUser, IdpError> {
        if !self.success {
            return Err(IdpError::InvalidToken {
                reason: format!("provider answered with code {}", self.code),
            });
        }

        self.data
            .into_iter()
            .next()
            .ok_or_else(|| IdpError::InvalidToken {
                reason: "provider returned no user".to_string(),
            })
    }
}
