//! Builds authenticated Sheets handles from configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ordersheet_core::{HandleFactory, ServiceHandle};
use ordersheet_domain::constants::SPREADSHEETS_SCOPE;
use ordersheet_domain::{GoogleConfig, HttpConfig, Result, SheetError};
use tracing::info;

use super::client::GoogleSheetsClient;
use crate::auth::{AccessTokenProvider, ServiceAccountKey, ServiceAccountTokenProvider};
use crate::http::HttpClient;

/// Loads the service-account key, obtains a scoped token and wraps both in
/// a [`GoogleSheetsClient`] that identifies itself with the application name.
#[derive(Debug, Clone)]
pub struct GoogleHandleFactory {
    application_name: String,
    credentials_path: PathBuf,
    sheets_api_base: String,
    timeout: Duration,
    max_attempts: usize,
}

impl GoogleHandleFactory {
    /// Factory for the configured spreadsheet service and HTTP policy.
    pub fn new(google: &GoogleConfig, http: &HttpConfig) -> Self {
        Self {
            application_name: google.application_name.clone(),
            credentials_path: google.credentials_path.clone(),
            sheets_api_base: google.sheets_api_base.clone(),
            timeout: Duration::from_secs(http.timeout_seconds),
            max_attempts: http.max_attempts,
        }
    }
}

#[async_trait]
impl HandleFactory for GoogleHandleFactory {
    /// # Errors
    /// `AuthenticationFailed` when the key file is missing or malformed, or
    /// the token exchange fails.
    async fn build(&self) -> Result<ServiceHandle> {
        let key = ServiceAccountKey::from_file(&self.credentials_path)?;

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .max_attempts(self.max_attempts)
            .user_agent(self.application_name.clone())
            .build()
            .map_err(|err| {
                SheetError::service_unavailable("Failed to build HTTP client", Some(Arc::new(err)))
            })?;

        let tokens = ServiceAccountTokenProvider::new(key, SPREADSHEETS_SCOPE, http.clone())?;
        // Fail construction, not the first request, when the grant is refused.
        tokens.access_token().await?;

        info!(
            application = %self.application_name,
            client_email = %tokens.client_email(),
            "spreadsheet service handle constructed"
        );

        Ok(Arc::new(GoogleSheetsClient::new(http, Arc::new(tokens), self.sheets_api_base.clone())))
    }
}
