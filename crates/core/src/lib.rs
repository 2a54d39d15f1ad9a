//! # OrderSheet Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for the remote spreadsheet and its handle lifecycle
//! - The sheet operation builder (ensure worksheet + header, then write)
//! - The access verification gate and transport error classification
//! - The order ledger service that drives one builder run per submission
//!
//! ## Architecture Principles
//! - Only depends on `ordersheet-domain`
//! - No HTTP, credential or cache code
//! - All external dependencies via traits

pub mod ledger;
pub mod sheets;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export specific items to avoid ambiguity
pub use ledger::OrderLedgerService;
pub use sheets::access::verify_access;
pub use sheets::builder::SheetOperationBuilder;
pub use sheets::ports::{HandleFactory, HandleProvider, ServiceHandle, SpreadsheetClient};
