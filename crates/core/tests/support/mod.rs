//! Shared test helpers for `ordersheet-core` integration tests.
//!
//! Fixtures for order records and rows so scenario tests can focus on
//! behaviour instead of boilerplate.

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use ordersheet_core::testing::{InMemorySpreadsheet, StaticHandleProvider};
use ordersheet_core::OrderLedgerService;
use ordersheet_domain::{CellValue, OrderRecord, Row};
use rust_decimal::Decimal;

pub const SPREADSHEET_ID: &str = "customers-sheet";

pub fn dec(text: &str) -> Decimal {
    Decimal::from_str(text).unwrap()
}

pub fn order(id: &str, product: &str, quantity: u32, price: &str, cost: &str) -> OrderRecord {
    OrderRecord::new(id, product, quantity, dec(price), dec(cost))
}

pub fn text_row(cells: &[&str]) -> Row {
    cells.iter().map(|cell| CellValue::from(*cell)).collect()
}

/// A ledger service wired to an in-memory spreadsheet.
pub fn ledger(
    sheet: InMemorySpreadsheet,
) -> (OrderLedgerService, Arc<InMemorySpreadsheet>, Arc<StaticHandleProvider>) {
    let sheet = Arc::new(sheet);
    let provider = Arc::new(StaticHandleProvider::new(sheet.clone()));
    let service = OrderLedgerService::new(provider.clone(), SPREADSHEET_ID);
    (service, sheet, provider)
}
