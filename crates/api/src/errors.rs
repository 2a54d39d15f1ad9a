//! Boundary error mapping
//!
//! Every ledger failure leaves the service as a JSON [`HandlerResponse`]
//! whose `status` is the upper-case kind code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ordersheet_domain::{ErrorKind, SheetError};
use thiserror::Error;
use tracing::error;

use crate::routes::HandlerResponse;
use crate::utils::logging::{cause_chain, error_label};

/// A ledger error on its way out of an HTTP handler.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub SheetError);

impl ApiError {
    /// HTTP status for the wrapped error kind.
    pub fn status_code(&self) -> StatusCode {
        status_for(self.0.kind())
    }
}

/// HTTP status for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
        ErrorKind::SheetNotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::AuthenticationFailed => StatusCode::UNAUTHORIZED,
        ErrorKind::OperationFailed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        error!(
            kind = error_label(&self.0),
            status = status.as_u16(),
            causes = %cause_chain(&self.0),
            "{}",
            self.0
        );
        (status, Json(HandlerResponse::error(&self.0))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use ordersheet_domain::RemoteError;

    use super::*;

    #[test]
    fn every_kind_has_its_status() {
        let cases = [
            (ErrorKind::PermissionDenied, 403),
            (ErrorKind::SheetNotFound, 404),
            (ErrorKind::InvalidRequest, 400),
            (ErrorKind::ServiceUnavailable, 503),
            (ErrorKind::AuthenticationFailed, 401),
            (ErrorKind::OperationFailed, 500),
        ];
        for (kind, code) in cases {
            assert_eq!(status_for(kind).as_u16(), code, "{kind}");
        }
    }

    #[test]
    fn response_uses_kind_status() {
        let err = ApiError::from(SheetError::operation_failed(
            "Failed to write values",
            RemoteError::Transport("reset".into()),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
