//! Access token provider backed by a service-account key.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::EncodingKey;
use ordersheet_domain::RemoteError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::key::{CredentialError, ServiceAccountKey, JWT_BEARER_GRANT};
use super::token::{AccessToken, TokenErrorResponse, TokenResponse};
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Refresh tokens this many seconds before they expire.
pub const DEFAULT_REFRESH_THRESHOLD_SECS: i64 = 60;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token, refreshing it if needed.
    async fn access_token(&self) -> Result<String, CredentialError>;
}

/// Exchanges signed assertions for tokens and caches the current one.
///
/// Refreshes are serialized: concurrent callers that find the token stale
/// wait for the one in-flight exchange.
pub struct ServiceAccountTokenProvider {
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    scope: String,
    http: HttpClient,
    current: Mutex<Option<AccessToken>>,
    refresh_threshold_seconds: i64,
}

impl ServiceAccountTokenProvider {
    /// # Errors
    /// `Signing` if the key's PEM cannot be parsed.
    pub fn new(
        key: ServiceAccountKey,
        scope: impl Into<String>,
        http: HttpClient,
    ) -> Result<Self, CredentialError> {
        let signing_key = key.encoding_key()?;
        Ok(Self {
            key,
            signing_key,
            scope: scope.into(),
            http,
            current: Mutex::new(None),
            refresh_threshold_seconds: DEFAULT_REFRESH_THRESHOLD_SECS,
        })
    }

    /// Service account the tokens are issued for.
    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    async fn exchange(&self) -> Result<AccessToken, CredentialError> {
        let assertion = self.key.sign_assertion(&self.signing_key, &self.scope, Utc::now())?;
        let body = format!(
            "grant_type={}&assertion={}",
            urlencoding::encode(JWT_BEARER_GRANT),
            urlencoding::encode(&assertion)
        );

        let request = self
            .http
            .request(Method::POST, &self.key.token_uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body);

        let response = self.http.send(request).await.map_err(CredentialError::Transport)?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| CredentialError::Transport(RemoteError::from(InfraError::from(err))))?;

        if !status.is_success() {
            let message = serde_json::from_str::<TokenErrorResponse>(&text)
                .map(|body| body.describe())
                .unwrap_or(text);
            warn!(status = status.as_u16(), %message, "token request rejected");
            return Err(CredentialError::Rejected { code: status.as_u16(), message });
        }

        let token: TokenResponse = serde_json::from_str(&text)
            .map_err(|err| CredentialError::MalformedResponse(err.to_string()))?;
        info!(
            client_email = %self.key.client_email,
            expires_in = token.expires_in,
            "service account token issued"
        );
        Ok(token.into())
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountTokenProvider {
    async fn access_token(&self) -> Result<String, CredentialError> {
        let mut current = self.current.lock().await;

        if let Some(token) = current.as_ref() {
            if !token.is_expired(self.refresh_threshold_seconds) {
                return Ok(token.value.clone());
            }
            debug!("access token near expiry, refreshing");
        }

        let token = self.exchange().await?;
        let value = token.value.clone();
        *current = Some(token);
        Ok(value)
    }
}
