//! Sheet operation builder
//!
//! Stages "ensure the worksheet exists with a header, then write rows"
//! against one spreadsheet and runs it in two remote phases: structural
//! updates first, value writes second.
//!
//! The stage is tracked in the type so calls can only happen in order:
//!
//! ```text
//! Initialized --for_sheet--> TargetSet --create_sheet_if_missing--> ExistenceChecked
//! ExistenceChecked --with_headers--> HeadersStaged
//! ExistenceChecked | HeadersStaged | ValuesStaged --with_values--> ValuesStaged
//! ValuesStaged --execute--> ExecutionSummary
//! ```

use std::marker::PhantomData;

use ordersheet_domain::{
    a1_range, ExecutionSummary, Result, Row, StructuralRequest, WorksheetLayout, WriteMode,
    WriteReceipt,
};
use tracing::{debug, info, warn};

use super::errors::{classify_existence_error, is_duplicate_sheet, operation_failed};
use super::ports::SpreadsheetClient;

/// Fresh builder with no worksheet selected.
#[derive(Debug)]
pub struct Initialized;
/// Worksheet name recorded.
#[derive(Debug)]
pub struct TargetSet;
/// Remote existence known; an add-worksheet command is staged if needed.
#[derive(Debug)]
pub struct ExistenceChecked;
/// Header row staged for a new worksheet.
#[derive(Debug)]
pub struct HeadersStaged;
/// At least one batch of values staged; ready to execute.
#[derive(Debug)]
pub struct ValuesStaged;

mod sealed {
    pub trait AcceptsValues {}
    impl AcceptsValues for super::ExistenceChecked {}
    impl AcceptsValues for super::HeadersStaged {}
    impl AcceptsValues for super::ValuesStaged {}
}

#[derive(Debug, Default)]
struct Plan {
    sheet_name: String,
    needs_new_sheet: bool,
    requests: Vec<StructuralRequest>,
    values: Vec<Row>,
    header_rows: usize,
}

/// Single-use builder for one worksheet write.
pub struct SheetOperationBuilder<'a, S = Initialized> {
    client: &'a dyn SpreadsheetClient,
    spreadsheet_id: String,
    layout: WorksheetLayout,
    plan: Plan,
    _state: PhantomData<S>,
}

impl<'a> SheetOperationBuilder<'a, Initialized> {
    /// Start a builder against `spreadsheet_id` with the default layout.
    pub fn new(client: &'a dyn SpreadsheetClient, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            layout: WorksheetLayout::default(),
            plan: Plan::default(),
            _state: PhantomData,
        }
    }

    /// Override the grid provisioning hint used for a new worksheet.
    pub fn with_layout(mut self, layout: WorksheetLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Select the worksheet to write. No remote call.
    pub fn for_sheet(mut self, sheet_name: impl Into<String>) -> SheetOperationBuilder<'a, TargetSet> {
        self.plan.sheet_name = sheet_name.into();
        self.transition()
    }
}

impl<'a> SheetOperationBuilder<'a, TargetSet> {
    /// Read the worksheet list and stage an add-worksheet command when the
    /// target title is absent.
    ///
    /// # Errors
    /// `PermissionDenied`, `SheetNotFound` or `AuthenticationFailed` for
    /// 403/404/401; `OperationFailed` for anything else.
    pub async fn create_sheet_if_missing(
        mut self,
    ) -> Result<SheetOperationBuilder<'a, ExistenceChecked>> {
        let metadata = self
            .client
            .get_metadata(&self.spreadsheet_id)
            .await
            .map_err(|err| classify_existence_error(&self.spreadsheet_id, err))?;

        if metadata.has_worksheet(&self.plan.sheet_name) {
            debug!(worksheet = %self.plan.sheet_name, "worksheet already exists");
        } else {
            debug!(worksheet = %self.plan.sheet_name, "worksheet missing, staging creation");
            self.plan.needs_new_sheet = true;
            self.plan.requests.push(StructuralRequest::AddWorksheet {
                title: self.plan.sheet_name.clone(),
                layout: self.layout,
            });
        }

        Ok(self.transition())
    }
}

impl<'a> SheetOperationBuilder<'a, ExistenceChecked> {
    /// Stage the header row as the first buffered row, but only when the
    /// worksheet is about to be created.
    pub fn with_headers(mut self, headers: Row) -> SheetOperationBuilder<'a, HeadersStaged> {
        if self.plan.needs_new_sheet {
            self.plan.values.insert(0, headers);
            self.plan.header_rows = 1;
        }
        self.transition()
    }
}

impl<'a, S: sealed::AcceptsValues> SheetOperationBuilder<'a, S> {
    /// Buffer data rows in call order.
    pub fn with_values<I>(mut self, rows: I) -> SheetOperationBuilder<'a, ValuesStaged>
    where
        I: IntoIterator<Item = Row>,
    {
        self.plan.values.extend(rows);
        self.transition()
    }
}

impl SheetOperationBuilder<'_, ValuesStaged> {
    /// Run the staged structural batch, then the value write.
    ///
    /// A new worksheet gets a full-range write at `A1`; an existing one gets
    /// an append after its last used row. When the add-worksheet command
    /// loses a creation race the header is dropped and the data rows are
    /// appended instead.
    ///
    /// # Errors
    /// `OperationFailed("Failed to execute sheet operations")` wrapping the
    /// remote cause.
    pub async fn execute(self) -> Result<ExecutionSummary> {
        const CONTEXT: &str = "Failed to execute sheet operations";

        let Self { client, spreadsheet_id, mut plan, .. } = self;
        let mut sheet_created = false;
        let mut mode = if plan.needs_new_sheet { WriteMode::Overwrite } else { WriteMode::Append };

        if !plan.requests.is_empty() {
            match client.batch_update(&spreadsheet_id, &plan.requests).await {
                Ok(_) => {
                    sheet_created = true;
                    info!(worksheet = %plan.sheet_name, "worksheet created");
                }
                Err(err) if is_duplicate_sheet(&err) => {
                    warn!(
                        worksheet = %plan.sheet_name,
                        error = %err,
                        "worksheet created concurrently, appending instead"
                    );
                    plan.values.drain(..plan.header_rows);
                    plan.header_rows = 0;
                    mode = WriteMode::Append;
                }
                Err(err) => return Err(operation_failed(CONTEXT, err)),
            }
        }

        let rows_written = plan.values.len() - plan.header_rows;
        if plan.values.is_empty() {
            return Ok(ExecutionSummary {
                worksheet: plan.sheet_name,
                sheet_created,
                mode: None,
                rows_written: 0,
                updated_range: None,
            });
        }

        let receipt: WriteReceipt = match mode {
            WriteMode::Overwrite => {
                let range = a1_range(&plan.sheet_name, Some("A1"));
                client.update_values(&spreadsheet_id, &range, &plan.values).await
            }
            WriteMode::Append => {
                let range = a1_range(&plan.sheet_name, None);
                client.append_values(&spreadsheet_id, &range, &plan.values).await
            }
        }
        .map_err(|err| operation_failed(CONTEXT, err))?;

        debug!(
            worksheet = %plan.sheet_name,
            mode = %mode,
            rows = rows_written,
            range = receipt.updated_range.as_deref().unwrap_or_default(),
            "values written"
        );

        Ok(ExecutionSummary {
            worksheet: plan.sheet_name,
            sheet_created,
            mode: Some(mode),
            rows_written,
            updated_range: receipt.updated_range,
        })
    }
}

impl<'a, S> SheetOperationBuilder<'a, S> {
    fn transition<T>(self) -> SheetOperationBuilder<'a, T> {
        SheetOperationBuilder {
            client: self.client,
            spreadsheet_id: self.spreadsheet_id,
            layout: self.layout,
            plan: self.plan,
            _state: PhantomData,
        }
    }

    /// Spreadsheet the builder writes to.
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Target worksheet title (empty before `for_sheet`).
    pub fn sheet_name(&self) -> &str {
        &self.plan.sheet_name
    }

    /// Whether an add-worksheet command is staged.
    pub fn needs_new_sheet(&self) -> bool {
        self.plan.needs_new_sheet
    }

    /// Structural commands `execute` will send first.
    pub fn staged_requests(&self) -> &[StructuralRequest] {
        &self.plan.requests
    }

    /// Buffered rows, header first when one is staged.
    pub fn pending_values(&self) -> &[Row] {
        &self.plan.values
    }
}

#[cfg(test)]
mod tests {
    use ordersheet_domain::{header_row, CellValue, ErrorKind, RemoteError};

    use super::*;
    use crate::testing::{InMemorySpreadsheet, Operation, RecordedCall};

    fn row(id: &str) -> Row {
        vec![id.into(), "Widget".into(), CellValue::Integer(1), "1.00".into(), "0.50".into()]
    }

    #[tokio::test]
    async fn stages_creation_and_header_for_missing_sheet() {
        let sheet = InMemorySpreadsheet::new("s1");
        let builder = SheetOperationBuilder::new(&sheet, "s1")
            .for_sheet("cust42")
            .create_sheet_if_missing()
            .await
            .unwrap()
            .with_headers(header_row())
            .with_values(vec![row("o1")]);

        assert!(builder.needs_new_sheet());
        assert_eq!(builder.staged_requests().len(), 1);
        assert_eq!(builder.pending_values().len(), 2);
        assert_eq!(builder.pending_values()[0], header_row());
    }

    #[tokio::test]
    async fn existing_sheet_skips_header_and_structural_request() {
        let sheet = InMemorySpreadsheet::new("s1").with_worksheet("cust7", vec![row("old")]);
        let builder = SheetOperationBuilder::new(&sheet, "s1")
            .for_sheet("cust7")
            .create_sheet_if_missing()
            .await
            .unwrap()
            .with_headers(header_row())
            .with_values(vec![row("o2")]);

        assert!(!builder.needs_new_sheet());
        assert!(builder.staged_requests().is_empty());
        assert_eq!(builder.pending_values(), &[row("o2")]);
    }

    #[tokio::test]
    async fn values_accumulate_in_call_order() {
        let sheet = InMemorySpreadsheet::new("s1").with_worksheet("cust7", Vec::new());
        let summary = SheetOperationBuilder::new(&sheet, "s1")
            .for_sheet("cust7")
            .create_sheet_if_missing()
            .await
            .unwrap()
            .with_values(vec![row("a")])
            .with_values(vec![row("b"), row("c")])
            .execute()
            .await
            .unwrap();

        assert_eq!(summary.rows_written, 3);
        assert_eq!(sheet.rows("cust7"), vec![row("a"), row("b"), row("c")]);
    }

    #[tokio::test]
    async fn new_sheet_is_written_from_a1() {
        let sheet = InMemorySpreadsheet::new("s1");
        let summary = SheetOperationBuilder::new(&sheet, "s1")
            .for_sheet("cust42")
            .create_sheet_if_missing()
            .await
            .unwrap()
            .with_headers(header_row())
            .with_values(vec![row("o1")])
            .execute()
            .await
            .unwrap();

        assert!(summary.sheet_created);
        assert_eq!(summary.mode, Some(WriteMode::Overwrite));
        assert_eq!(summary.rows_written, 1);

        let calls = sheet.calls();
        assert!(matches!(calls[1], RecordedCall::BatchUpdate { .. }));
        match &calls[2] {
            RecordedCall::UpdateValues { range, rows } => {
                assert_eq!(range, "'cust42'!A1");
                assert_eq!(rows.len(), 2);
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_values_skip_the_value_write() {
        let sheet = InMemorySpreadsheet::new("s1").with_worksheet("cust7", Vec::new());
        let summary = SheetOperationBuilder::new(&sheet, "s1")
            .for_sheet("cust7")
            .create_sheet_if_missing()
            .await
            .unwrap()
            .with_values(Vec::new())
            .execute()
            .await
            .unwrap();

        assert_eq!(summary.mode, None);
        assert_eq!(sheet.calls().len(), 1);
    }

    #[tokio::test]
    async fn existence_check_failures_are_classified() {
        let sheet = InMemorySpreadsheet::new("s1");
        sheet.fail_next(
            Operation::GetMetadata,
            RemoteError::Status { code: 500, status: None, message: "backend".into() },
        );
        let err = SheetOperationBuilder::new(&sheet, "s1")
            .for_sheet("cust7")
            .create_sheet_if_missing()
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::OperationFailed);
        assert_eq!(err.message(), "Failed to check sheet existence");
    }

    #[tokio::test]
    async fn value_write_failure_is_operation_failed() {
        let sheet = InMemorySpreadsheet::new("s1").with_worksheet("cust7", Vec::new());
        sheet.fail_next(Operation::AppendValues, RemoteError::Transport("reset".into()));

        let err = SheetOperationBuilder::new(&sheet, "s1")
            .for_sheet("cust7")
            .create_sheet_if_missing()
            .await
            .unwrap()
            .with_values(vec![row("o1")])
            .execute()
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::OperationFailed);
        assert_eq!(err.message(), "Failed to execute sheet operations");
    }

    #[tokio::test]
    async fn lost_creation_race_appends_without_header() {
        let sheet = InMemorySpreadsheet::new("s1");
        let builder = SheetOperationBuilder::new(&sheet, "s1")
            .for_sheet("cust9")
            .create_sheet_if_missing()
            .await
            .unwrap()
            .with_headers(header_row())
            .with_values(vec![row("o1")]);

        // Another writer creates the worksheet between check and execute.
        sheet.add_worksheet("cust9", vec![header_row()]);

        let summary = builder.execute().await.unwrap();
        assert!(!summary.sheet_created);
        assert_eq!(summary.mode, Some(WriteMode::Append));
        assert_eq!(summary.rows_written, 1);
        assert_eq!(sheet.rows("cust9"), vec![header_row(), row("o1")]);
    }
}
