//! In-memory test doubles for the spreadsheet ports.
//!
//! Available to this crate's tests and, through the `test-utils` feature, to
//! downstream crates.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use ordersheet_domain::{
    RemoteError, Result, Row, SheetError, SpreadsheetMetadata, StructuralRequest,
    WorksheetProperties, WriteReceipt,
};

use crate::sheets::ports::{HandleProvider, ServiceHandle, SpreadsheetClient};

/// Remote operation selector for injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetMetadata,
    BatchUpdate,
    UpdateValues,
    AppendValues,
}

/// A call observed by [`InMemorySpreadsheet`], in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    GetMetadata { spreadsheet_id: String },
    BatchUpdate { requests: Vec<StructuralRequest> },
    UpdateValues { range: String, rows: Vec<Row> },
    AppendValues { range: String, rows: Vec<Row> },
}

#[derive(Debug, Default)]
struct State {
    // Worksheets in creation order with their used rows.
    worksheets: Vec<(String, Vec<Row>)>,
    calls: Vec<RecordedCall>,
    failures: HashMap<Operation, VecDeque<RemoteError>>,
}

impl State {
    fn worksheet_mut(&mut self, title: &str) -> Option<&mut Vec<Row>> {
        self.worksheets.iter_mut().find(|(name, _)| name == title).map(|(_, rows)| rows)
    }

    fn take_failure(&mut self, op: Operation) -> Option<RemoteError> {
        self.failures.get_mut(&op).and_then(VecDeque::pop_front)
    }
}

/// A single spreadsheet held in memory that behaves like the remote
/// service: exact title matching, duplicate-title rejection, `A1`
/// overwrites and appends after the last used row.
#[derive(Debug)]
pub struct InMemorySpreadsheet {
    spreadsheet_id: String,
    state: Mutex<State>,
}

impl InMemorySpreadsheet {
    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self { spreadsheet_id: spreadsheet_id.into(), state: Mutex::new(State::default()) }
    }

    /// Seed a worksheet with existing rows.
    pub fn with_worksheet(self, title: impl Into<String>, rows: Vec<Row>) -> Self {
        self.add_worksheet(title, rows);
        self
    }

    /// Create a worksheet out of band, as another writer would.
    pub fn add_worksheet(&self, title: impl Into<String>, rows: Vec<Row>) {
        self.lock().worksheets.push((title.into(), rows));
    }

    /// Fail the next call of `op` with `err`. Queued failures are consumed
    /// in order.
    pub fn fail_next(&self, op: Operation, err: RemoteError) {
        self.lock().failures.entry(op).or_default().push_back(err);
    }

    /// Rows currently stored in a worksheet (empty if it does not exist).
    pub fn rows(&self, title: &str) -> Vec<Row> {
        self.lock().worksheet_mut(title).map(|rows| rows.clone()).unwrap_or_default()
    }

    pub fn worksheet_titles(&self) -> Vec<String> {
        self.lock().worksheets.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_id(&self, spreadsheet_id: &str) -> std::result::Result<(), RemoteError> {
        if spreadsheet_id == self.spreadsheet_id {
            Ok(())
        } else {
            Err(RemoteError::Status {
                code: 404,
                status: Some("NOT_FOUND".into()),
                message: "Requested entity was not found.".into(),
            })
        }
    }
}

/// Split `'title'!A1` into the unquoted title and the optional cell.
fn parse_range(range: &str) -> (String, Option<String>) {
    let (sheet, cell) = match range.rsplit_once('!') {
        Some((sheet, cell)) => (sheet, Some(cell.to_string())),
        None => (range, None),
    };
    let title = sheet
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .map(|s| s.replace("''", "'"))
        .unwrap_or_else(|| sheet.to_string());
    (title, cell)
}

fn missing_range(range: &str) -> RemoteError {
    RemoteError::Status {
        code: 400,
        status: Some("INVALID_ARGUMENT".into()),
        message: format!("Unable to parse range: {range}"),
    }
}

#[async_trait]
impl SpreadsheetClient for InMemorySpreadsheet {
    async fn get_metadata(
        &self,
        spreadsheet_id: &str,
    ) -> std::result::Result<SpreadsheetMetadata, RemoteError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::GetMetadata { spreadsheet_id: spreadsheet_id.into() });
        if let Some(err) = state.take_failure(Operation::GetMetadata) {
            return Err(err);
        }
        self.check_id(spreadsheet_id)?;

        let worksheets = state
            .worksheets
            .iter()
            .enumerate()
            .map(|(index, (title, _))| WorksheetProperties {
                sheet_id: i64::try_from(index).ok(),
                title: title.clone(),
            })
            .collect();
        Ok(SpreadsheetMetadata { spreadsheet_id: spreadsheet_id.into(), worksheets })
    }

    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: &[StructuralRequest],
    ) -> std::result::Result<Vec<WorksheetProperties>, RemoteError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::BatchUpdate { requests: requests.to_vec() });
        if let Some(err) = state.take_failure(Operation::BatchUpdate) {
            return Err(err);
        }
        self.check_id(spreadsheet_id)?;

        // The batch is atomic: validate every request before applying any.
        for (index, request) in requests.iter().enumerate() {
            let StructuralRequest::AddWorksheet { title, .. } = request;
            if state.worksheets.iter().any(|(name, _)| name == title) {
                return Err(RemoteError::Status {
                    code: 400,
                    status: Some("INVALID_ARGUMENT".into()),
                    message: format!(
                        "Invalid requests[{index}].addSheet: A sheet with the name \"{title}\" already exists. Please enter another name."
                    ),
                });
            }
        }

        let mut created = Vec::with_capacity(requests.len());
        for request in requests {
            let StructuralRequest::AddWorksheet { title, .. } = request;
            state.worksheets.push((title.clone(), Vec::new()));
            created.push(WorksheetProperties {
                sheet_id: i64::try_from(state.worksheets.len() - 1).ok(),
                title: title.clone(),
            });
        }
        Ok(created)
    }

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Row],
    ) -> std::result::Result<WriteReceipt, RemoteError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::UpdateValues { range: range.into(), rows: rows.to_vec() });
        if let Some(err) = state.take_failure(Operation::UpdateValues) {
            return Err(err);
        }
        self.check_id(spreadsheet_id)?;

        let (title, _) = parse_range(range);
        let stored = state.worksheet_mut(&title).ok_or_else(|| missing_range(range))?;
        for (index, row) in rows.iter().enumerate() {
            if index < stored.len() {
                stored[index] = row.clone();
            } else {
                stored.push(row.clone());
            }
        }

        Ok(WriteReceipt {
            updated_range: Some(format!("{range}:E{}", rows.len())),
            updated_rows: u32::try_from(rows.len()).unwrap_or(u32::MAX),
        })
    }

    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Row],
    ) -> std::result::Result<WriteReceipt, RemoteError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::AppendValues { range: range.into(), rows: rows.to_vec() });
        if let Some(err) = state.take_failure(Operation::AppendValues) {
            return Err(err);
        }
        self.check_id(spreadsheet_id)?;

        let (title, _) = parse_range(range);
        let stored = state.worksheet_mut(&title).ok_or_else(|| missing_range(range))?;
        let first = stored.len() + 1;
        stored.extend(rows.iter().cloned());

        Ok(WriteReceipt {
            updated_range: Some(format!("{range}!A{first}:E{}", stored.len())),
            updated_rows: u32::try_from(rows.len()).unwrap_or(u32::MAX),
        })
    }
}

/// Hands out one fixed handle and counts invalidations.
pub struct StaticHandleProvider {
    handle: ServiceHandle,
    invalidations: AtomicUsize,
}

impl StaticHandleProvider {
    pub fn new(handle: ServiceHandle) -> Self {
        Self { handle, invalidations: AtomicUsize::new(0) }
    }

    pub fn invalidations(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HandleProvider for StaticHandleProvider {
    async fn handle(&self) -> Result<ServiceHandle> {
        Ok(self.handle.clone())
    }

    async fn invalidate(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}

/// Always fails handle construction with the configured error.
pub struct FailingHandleProvider {
    error: SheetError,
    invalidations: AtomicUsize,
}

impl FailingHandleProvider {
    pub fn new(error: SheetError) -> Self {
        Self { error, invalidations: AtomicUsize::new(0) }
    }

    pub fn invalidations(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HandleProvider for FailingHandleProvider {
    async fn handle(&self) -> Result<ServiceHandle> {
        Err(self.error.clone())
    }

    async fn invalidate(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}
