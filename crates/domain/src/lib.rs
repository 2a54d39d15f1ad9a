//! # OrderSheet Domain
//!
//! Business domain types and models for the order ledger.
//!
//! This crate contains:
//! - Order records and their spreadsheet row form
//! - Worksheet targets, layouts and write results
//! - The error taxonomy and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other OrderSheet crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
