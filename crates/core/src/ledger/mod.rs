//! Order ledger: one worksheet per customer, one row per order.

pub mod service;

pub use service::OrderLedgerService;
