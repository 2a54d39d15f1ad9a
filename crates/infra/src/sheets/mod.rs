//! Google Sheets integration
//!
//! - `client`: REST client implementing `SpreadsheetClient`
//! - `cache`: time-bounded, single-flight service handle cache
//! - `factory`: builds authenticated handles from configuration

pub mod cache;
pub mod client;
pub mod factory;
mod wire;

pub use cache::{HandleCacheConfig, ServiceHandleCache};
pub use client::GoogleSheetsClient;
pub use factory::GoogleHandleFactory;
