//! # OrderSheet Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP client with retry for idempotent requests
//! - Service-account credential loading and token exchange
//! - Google Sheets v4 REST client implementing `SpreadsheetClient`
//! - The time-bounded, single-flight service handle cache
//! - Configuration loading from env vars and files
//!
//! ## Architecture
//! - Implements traits defined in `ordersheet-core`
//! - Contains all "impure" code (network, filesystem, clocks)

pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod sheets;

// Re-export commonly used items
pub use auth::{AccessTokenProvider, ServiceAccountKey, ServiceAccountTokenProvider};
pub use errors::InfraError;
pub use http::HttpClient;
pub use sheets::{GoogleHandleFactory, GoogleSheetsClient, ServiceHandleCache};
