//! # OrderSheet API
//!
//! HTTP application layer - webhook routes and main entry point.
//!
//! This crate contains:
//! - The axum router (`POST /webhook/listening`, `GET /health`)
//! - Boundary error mapping from the ledger taxonomy to HTTP responses
//! - Application context (dependency injection)
//! - Logging setup and request logging
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod context;
pub mod errors;
pub mod routes;
pub mod utils;

// Re-export for convenience
pub use context::AppContext;
pub use errors::ApiError;
pub use routes::{router, HandlerResponse};
