//! Outbound HTTP for the token endpoint and the Sheets API.

use std::time::Duration;

use ordersheet_domain::RemoteError;
use reqwest::{
    Client as ReqwestClient, IntoUrl, Method, Request, RequestBuilder, Response, StatusCode,
};
use tracing::{debug, warn};

use crate::errors::InfraError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_ATTEMPTS: usize = 3;
const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(200);

/// Shared reqwest client with a per-request timeout and bounded retry.
///
/// Only idempotent requests (`GET`, `HEAD`, `PUT`, `DELETE`, `OPTIONS`) are
/// retried, on connect/timeout failures, 5xx and 429. A `POST` such as an
/// append or a token exchange is sent exactly once.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client with the default timeout and retry policy.
    pub fn new() -> Result<Self, RemoteError> {
        Self::builder().build()
    }

    /// Request builder bound to the shared connection pool.
    pub fn request(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send `builder`, retrying idempotent requests per the client policy.
    ///
    /// # Errors
    /// `RemoteError::Transport` when no response arrives after the last
    /// attempt. Non-success statuses are returned as responses.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, RemoteError> {
        let request = builder.build().map_err(|err| RemoteError::from(InfraError::from(err)))?;
        let attempts = if is_idempotent(request.method()) { self.max_attempts } else { 1 };

        let mut next = Some(request);
        let mut attempt = 0;
        while let Some(request) = next.take() {
            attempt += 1;
            // Streaming bodies cannot be cloned; such requests get one attempt.
            if attempt < attempts {
                next = request.try_clone();
            }
            let can_retry = next.is_some();

            match self.execute(request, attempt).await {
                Ok(response) if can_retry && is_retryable_status(response.status()) => {
                    warn!(attempt, status = %response.status(), "retrying HTTP request");
                }
                Ok(response) => return Ok(response),
                Err(err) if can_retry && is_retryable_error(&err) => {
                    warn!(attempt, error = %err, "retrying HTTP request");
                }
                Err(err) => return Err(InfraError::from(err).into()),
            }
            tokio::time::sleep(self.backoff(attempt)).await;
        }

        Err(RemoteError::Transport("HTTP request produced no response".into()))
    }

    async fn execute(&self, request: Request, attempt: usize) -> reqwest::Result<Response> {
        debug!(attempt, method = %request.method(), url = %request.url(), "sending HTTP request");
        let response = self.client.execute(request).await?;
        debug!(attempt, status = %response.status(), "received HTTP response");
        Ok(response)
    }

    /// Exponential backoff: `base`, `2 * base`, `4 * base`, capped at 2^8.
    fn backoff(&self, attempt: usize) -> Duration {
        let exponent = u32::try_from(attempt.saturating_sub(1).min(8)).unwrap_or(8);
        self.base_backoff.saturating_mul(1 << exponent)
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: DEFAULT_BASE_BACKOFF,
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts for idempotent requests (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Delay before the first retry; doubles on each further retry.
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    /// `User-Agent` header; the handle factory sends the application name.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// # Errors
    /// `RemoteError::Transport` if the TLS backend cannot be initialised.
    pub fn build(self) -> Result<HttpClient, RemoteError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        let client = builder.build().map_err(|err| RemoteError::from(InfraError::from(err)))?;

        Ok(HttpClient { client, max_attempts: self.max_attempts, base_backoff: self.base_backoff })
    }
}

fn is_idempotent(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::PUT | Method::DELETE | Method::OPTIONS)
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
