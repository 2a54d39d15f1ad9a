//! Application constants
//!
//! Centralized location for the domain-level constants of the ledger.

use std::time::Duration;

// Worksheet layout for newly provisioned customer sheets
pub const WORKSHEET_ROW_CAPACITY: u32 = 500;
pub const WORKSHEET_COLUMN_CAPACITY: u32 = 5;
pub const WORKSHEET_FROZEN_ROWS: u32 = 1;

// Header written as row 1 of every new worksheet
pub const HEADER_ROW: [&str; 5] = ["ID", "ITEM", "AMOUNT", "PRICE", "COST"];

// Service handle lifetime
pub const DEFAULT_HANDLE_TTL: Duration = Duration::from_secs(60 * 60);

// Google APIs
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";
pub const VALUE_INPUT_RAW: &str = "RAW";
pub const INSERT_ROWS: &str = "INSERT_ROWS";

// Inbound webhook
pub const WEBHOOK_TARGET_HEADER: &str = "userId";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
