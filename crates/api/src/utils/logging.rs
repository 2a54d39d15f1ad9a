use std::error::Error;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use ordersheet_domain::{ErrorKind, SheetError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log output format (`json` or text).
pub const LOG_FORMAT_ENV: &str = "ORDERSHEET_LOG_FORMAT";

const DEFAULT_LOG_FILTER: &str = "info";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` controls the filter; `ORDERSHEET_LOG_FORMAT=json` switches to
/// one JSON object per line.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init_tracing() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}

/// Log the outcome of every request with structured fields.
///
/// Server errors are logged at `warn`; the handler has already logged the
/// cause at `error`.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if response.status().is_success() {
        info!(%method, path, status, duration_ms, "request_completed");
    } else {
        warn!(%method, path, status, duration_ms, "request_failed");
    }
    response
}

/// Convert a `SheetError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &SheetError) -> &'static str {
    match error.kind() {
        ErrorKind::AuthenticationFailed => "authentication_failed",
        ErrorKind::PermissionDenied => "permission_denied",
        ErrorKind::SheetNotFound => "sheet_not_found",
        ErrorKind::ServiceUnavailable => "service_unavailable",
        ErrorKind::InvalidRequest => "invalid_request",
        ErrorKind::OperationFailed => "operation_failed",
    }
}

/// Render an error's source chain as `outer: inner: root`, excluding the
/// error itself. Empty when there is no source.
pub fn cause_chain(error: &dyn Error) -> String {
    let mut causes = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }
    causes.join(": ")
}
