//! Order ledger service
//!
//! Drives one builder run per submission: fetch the shared handle, verify
//! access, ensure the customer worksheet exists with a header, then write
//! the order rows.

use std::sync::Arc;

use ordersheet_domain::{header_row, ExecutionSummary, OrderRecord, Result, Row, SheetError};
use tracing::{debug, error, info};

use crate::sheets::access::verify_access;
use crate::sheets::builder::SheetOperationBuilder;
use crate::sheets::ports::HandleProvider;

/// Appends orders to per-customer worksheets of one spreadsheet.
pub struct OrderLedgerService {
    handles: Arc<dyn HandleProvider>,
    spreadsheet_id: String,
}

impl OrderLedgerService {
    /// Ledger writing to `spreadsheet_id` through handles from `handles`.
    pub fn new(handles: Arc<dyn HandleProvider>, spreadsheet_id: impl Into<String>) -> Self {
        Self { handles, spreadsheet_id: spreadsheet_id.into() }
    }

    /// Spreadsheet holding the customer worksheets.
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Record a single order in the worksheet named `target_id`.
    pub async fn submit(&self, order: &OrderRecord, target_id: &str) -> Result<ExecutionSummary> {
        self.submit_batch(std::slice::from_ref(order), target_id).await
    }

    /// Record several orders for one customer in a single builder run.
    ///
    /// Rows keep the order of `orders`.
    ///
    /// # Errors
    /// - `InvalidRequest` when `target_id` is blank or `orders` is empty
    /// - any error from handle construction, access verification or the
    ///   builder; `AuthenticationFailed` and `ServiceUnavailable` also drop
    ///   the cached handle
    pub async fn submit_batch(
        &self,
        orders: &[OrderRecord],
        target_id: &str,
    ) -> Result<ExecutionSummary> {
        if target_id.trim().is_empty() {
            return Err(SheetError::invalid_request("Target worksheet id must not be blank"));
        }
        if orders.is_empty() {
            return Err(SheetError::invalid_request("At least one order is required"));
        }

        let rows: Vec<Row> = orders.iter().map(|order| order.to_row().into()).collect();
        debug!(worksheet = target_id, orders = rows.len(), "submitting orders");

        match self.write_rows(target_id, rows).await {
            Ok(summary) => {
                let mode = summary.mode.map_or_else(|| "none".to_string(), |mode| mode.to_string());
                info!(
                    worksheet = target_id,
                    rows = summary.rows_written,
                    sheet_created = summary.sheet_created,
                    mode = %mode,
                    "orders recorded"
                );
                Ok(summary)
            }
            Err(err) => {
                error!(worksheet = target_id, kind = %err.kind(), error = %err, "failed to record orders");
                if err.invalidates_handle() {
                    self.handles.invalidate().await;
                }
                Err(err)
            }
        }
    }

    async fn write_rows(&self, target_id: &str, rows: Vec<Row>) -> Result<ExecutionSummary> {
        let handle = self.handles.handle().await?;
        verify_access(handle.as_ref(), &self.spreadsheet_id).await?;

        SheetOperationBuilder::new(handle.as_ref(), self.spreadsheet_id.as_str())
            .for_sheet(target_id)
            .create_sheet_if_missing()
            .await?
            .with_headers(header_row())
            .with_values(rows)
            .execute()
            .await
    }
}
