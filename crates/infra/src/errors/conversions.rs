//! Conversions from external infrastructure errors into `RemoteError`.

use ordersheet_domain::RemoteError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;

use crate::auth::CredentialError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain transport error.
#[derive(Debug)]
pub struct InfraError(pub RemoteError);

impl From<InfraError> for RemoteError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<RemoteError> for InfraError {
    fn from(value: RemoteError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoRemoteError {
    fn into_remote(self) -> RemoteError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → RemoteError */
/* -------------------------------------------------------------------------- */

impl IntoRemoteError for HttpError {
    fn into_remote(self) -> RemoteError {
        if self.is_timeout() {
            return RemoteError::Transport("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return RemoteError::Transport("HTTP connection failure".into());
        }

        if self.is_decode() {
            return RemoteError::Decode(self.to_string());
        }

        if let Some(status) = self.status() {
            return RemoteError::Status {
                code: status.as_u16(),
                status: status.canonical_reason().map(str::to_string),
                message: self.to_string(),
            };
        }

        RemoteError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_remote())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → RemoteError */
/* -------------------------------------------------------------------------- */

impl IntoRemoteError for JsonError {
    fn into_remote(self) -> RemoteError {
        RemoteError::Decode(format!("invalid JSON payload: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_remote())
    }
}

/* -------------------------------------------------------------------------- */
/* CredentialError → RemoteError */
/* -------------------------------------------------------------------------- */

// A token that cannot be obtained mid-request is reported like a rejected
// bearer token, except when the token endpoint itself is unreachable or
// failing.
impl IntoRemoteError for CredentialError {
    fn into_remote(self) -> RemoteError {
        match self {
            CredentialError::Transport(err) => err,
            CredentialError::Rejected { code, message } if code >= 500 => {
                RemoteError::Status { code, status: None, message }
            }
            other => RemoteError::Status {
                code: 401,
                status: Some("UNAUTHENTICATED".into()),
                message: other.to_string(),
            },
        }
    }
}

impl From<CredentialError> for InfraError {
    fn from(value: CredentialError) -> Self {
        InfraError(value.into_remote())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
