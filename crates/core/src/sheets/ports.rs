//! Port interfaces for the remote spreadsheet service
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use std::sync::Arc;

use async_trait::async_trait;
use ordersheet_domain::{
    RemoteError, Result, Row, SpreadsheetMetadata, StructuralRequest, WorksheetProperties,
    WriteReceipt,
};

/// Authenticated client for one spreadsheet service.
///
/// Implementations report raw transport failures as [`RemoteError`];
/// classification into the domain taxonomy happens in the core.
#[async_trait]
pub trait SpreadsheetClient: Send + Sync {
    /// Read the worksheet list of a spreadsheet.
    async fn get_metadata(
        &self,
        spreadsheet_id: &str,
    ) -> std::result::Result<SpreadsheetMetadata, RemoteError>;

    /// Apply structural commands in one batch; returns the created
    /// worksheets.
    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: &[StructuralRequest],
    ) -> std::result::Result<Vec<WorksheetProperties>, RemoteError>;

    /// Write rows into a fixed range (RAW input).
    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Row],
    ) -> std::result::Result<WriteReceipt, RemoteError>;

    /// Append rows after the last used row of a range (RAW input,
    /// INSERT_ROWS).
    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Row],
    ) -> std::result::Result<WriteReceipt, RemoteError>;
}

/// Shared, authenticated client handle.
pub type ServiceHandle = Arc<dyn SpreadsheetClient>;

/// Source of the process-wide service handle.
#[async_trait]
pub trait HandleProvider: Send + Sync {
    /// Get the current handle, constructing it if needed.
    async fn handle(&self) -> Result<ServiceHandle>;

    /// Drop the current handle so the next call rebuilds it.
    async fn invalidate(&self);
}

/// Builds a fresh authenticated handle (credentials + client).
#[async_trait]
pub trait HandleFactory: Send + Sync {
    async fn build(&self) -> Result<ServiceHandle>;
}
