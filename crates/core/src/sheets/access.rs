//! Access verification gate
//!
//! One metadata read before any update touching a spreadsheet.

use ordersheet_domain::{Result, SpreadsheetMetadata};
use tracing::{debug, warn};

use super::errors::classify_access_error;
use super::ports::SpreadsheetClient;

/// Confirm read access to `spreadsheet_id`.
///
/// # Errors
/// - `PermissionDenied` on 403 (message names the spreadsheet)
/// - `SheetNotFound` on 404
/// - `AuthenticationFailed` on 401
/// - `ServiceUnavailable` for any other status or transport failure
pub async fn verify_access(
    client: &dyn SpreadsheetClient,
    spreadsheet_id: &str,
) -> Result<SpreadsheetMetadata> {
    match client.get_metadata(spreadsheet_id).await {
        Ok(metadata) => {
            debug!(spreadsheet_id, worksheets = metadata.worksheets.len(), "spreadsheet access verified");
            Ok(metadata)
        }
        Err(err) => {
            warn!(spreadsheet_id, error = %err, "spreadsheet access check failed");
            Err(classify_access_error(spreadsheet_id, err))
        }
    }
}
