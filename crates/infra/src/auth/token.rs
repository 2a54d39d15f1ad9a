//! Access tokens returned by the token endpoint.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// A bearer token with its absolute expiry.
#[derive(Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Token valid for `expires_in_seconds` from now.
    pub fn new(value: impl Into<String>, expires_in_seconds: i64) -> Self {
        Self { value: value.into(), expires_at: Utc::now() + Duration::seconds(expires_in_seconds) }
    }

    /// Expired, or expiring within `threshold_seconds`.
    pub fn is_expired(&self, threshold_seconds: i64) -> bool {
        Utc::now() + Duration::seconds(threshold_seconds) >= self.expires_at
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken").field("expires_at", &self.expires_at).finish_non_exhaustive()
    }
}

/// Successful token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl From<TokenResponse> for AccessToken {
    fn from(response: TokenResponse) -> Self {
        AccessToken::new(response.access_token, response.expires_in)
    }
}

/// Token endpoint error body (`{"error":"invalid_grant",...}`).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl TokenErrorResponse {
    /// `error: description` text for logs and error messages.
    pub fn describe(&self) -> String {
        match &self.error_description {
            Some(description) => format!("{}: {description}", self.error),
            None => self.error.clone(),
        }
    }
}
