//! Classification of remote transport failures into the domain taxonomy.
//!
//! | status | access check | existence check | structural / value write |
//! |--------|--------------|-----------------|--------------------------|
//! | 401 | `AuthenticationFailed` | `AuthenticationFailed` | `OperationFailed` |
//! | 403 | `PermissionDenied` | `PermissionDenied` | `OperationFailed` |
//! | 404 | `SheetNotFound` | `SheetNotFound` | `OperationFailed` |
//! | other / transport | `ServiceUnavailable` | `OperationFailed` | `OperationFailed` |

use std::sync::Arc;

use ordersheet_domain::{Cause, RemoteError, SheetError};

fn cause(err: RemoteError) -> Option<Cause> {
    Some(Arc::new(err))
}

/// Classify a failed access pre-check.
pub fn classify_access_error(spreadsheet_id: &str, err: RemoteError) -> SheetError {
    match err.status_code() {
        Some(401) => SheetError::AuthenticationFailed {
            message: format!("Credentials rejected while reading spreadsheet {spreadsheet_id}"),
            source: cause(err),
        },
        Some(403) => SheetError::permission_denied(
            format!("Access denied to spreadsheet {spreadsheet_id}"),
            cause(err),
        ),
        Some(404) => SheetError::sheet_not_found(
            format!("Spreadsheet {spreadsheet_id} not found"),
            cause(err),
        ),
        _ => SheetError::service_unavailable(
            format!("Spreadsheet service unavailable while reading {spreadsheet_id}"),
            cause(err),
        ),
    }
}

/// Classify a failed worksheet-list read inside the builder.
pub fn classify_existence_error(spreadsheet_id: &str, err: RemoteError) -> SheetError {
    match err.status_code() {
        Some(401 | 403 | 404) => classify_access_error(spreadsheet_id, err),
        _ => SheetError::operation_failed("Failed to check sheet existence", err),
    }
}

/// Wrap a failed structural update or value write.
pub fn operation_failed(context: &str, err: RemoteError) -> SheetError {
    SheetError::operation_failed(context, err)
}

/// Whether a structural update failed only because the worksheet was
/// created concurrently by someone else.
pub fn is_duplicate_sheet(err: &RemoteError) -> bool {
    match err {
        RemoteError::Status { code: 400, message, .. } => {
            message.to_ascii_lowercase().contains("already exists")
        }
        _ => false,
    }
}
