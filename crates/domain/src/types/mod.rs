//! Domain data types
//!
//! - `order`: webhook order records and their row conversion
//! - `sheet`: worksheet layouts, staged commands and write results

pub mod order;
pub mod sheet;

pub use order::{CellValue, OrderRecord, OrderRow};
pub use sheet::{
    a1_range, header_row, quote_sheet_name, ExecutionSummary, Row, SpreadsheetMetadata,
    StructuralRequest, WorksheetLayout, WorksheetProperties, WriteMode,
    WriteReceipt,
};
