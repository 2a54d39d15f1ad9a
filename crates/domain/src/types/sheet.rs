//! Spreadsheet-side types: layouts, staged commands and the results of a
//! write.

use serde::{Deserialize, Serialize};

use super::order::CellValue;
use crate::constants::{
    HEADER_ROW, WORKSHEET_COLUMN_CAPACITY, WORKSHEET_FROZEN_ROWS, WORKSHEET_ROW_CAPACITY,
};
use crate::impl_domain_status_conversions;

/// One row of cells as sent to the spreadsheet service.
pub type Row = Vec<CellValue>;

/// Grid provisioning hint for newly created worksheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetLayout {
    pub row_count: u32,
    pub column_count: u32,
    pub frozen_row_count: u32,
}

impl Default for WorksheetLayout {
    fn default() -> Self {
        Self {
            row_count: WORKSHEET_ROW_CAPACITY,
            column_count: WORKSHEET_COLUMN_CAPACITY,
            frozen_row_count: WORKSHEET_FROZEN_ROWS,
        }
    }
}

/// The constant header row `["ID","ITEM","AMOUNT","PRICE","COST"]`.
pub fn header_row() -> Row {
    HEADER_ROW.iter().map(|title| CellValue::from(*title)).collect()
}

/// Properties of an existing worksheet as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetProperties {
    pub sheet_id: Option<i64>,
    pub title: String,
}

/// The worksheet list of a spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadsheetMetadata {
    pub spreadsheet_id: String,
    pub worksheets: Vec<WorksheetProperties>,
}

impl SpreadsheetMetadata {
    /// Exact, case-sensitive title match.
    pub fn has_worksheet(&self, title: &str) -> bool {
        self.worksheets.iter().any(|sheet| sheet.title == title)
    }
}

/// A topology-changing command sent in a structural batch update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralRequest {
    AddWorksheet { title: String, layout: WorksheetLayout },
}

/// How the values buffer is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Full-range write starting at `A1` of a freshly created worksheet
    Overwrite,
    /// Insert after the last used row of an existing worksheet
    Append,
}

impl_domain_status_conversions!(WriteMode {
    Overwrite => "overwrite",
    Append => "append",
});

/// Result of a value write round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReceipt {
    pub updated_range: Option<String>,
    pub updated_rows: u32,
}

/// What one builder run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub worksheet: String,
    pub sheet_created: bool,
    pub mode: Option<WriteMode>,
    pub rows_written: usize,
    pub updated_range: Option<String>,
}

/// Quote a worksheet title for A1 notation (`'Bob''s'`).
pub fn quote_sheet_name(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// A1 range for a worksheet, optionally anchored at a cell.
pub fn a1_range(title: &str, cell: Option<&str>) -> String {
    match cell {
        Some(cell) => format!("{}!{cell}", quote_sheet_name(title)),
        None => quote_sheet_name(title),
    }
}
