//! HTTP routes
//!
//! - `webhook`: order events from the storefront
//! - `health`: liveness check

pub mod health;
pub mod webhook;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use ordersheet_domain::{ExecutionSummary, SheetError};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;

use crate::context::AppContext;
use crate::utils::logging::log_requests;

/// Build the service router.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/webhook/listening", post(webhook::receive_orders))
        .route("/health", get(health::health))
        .layer(ServiceBuilder::new().layer(middleware::from_fn(log_requests)))
        .with_state(ctx)
}

/// JSON body returned by the webhook, for success and failure alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_written: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_created: Option<bool>,
}

impl HandlerResponse {
    /// Success body for a completed write.
    pub fn ok(summary: &ExecutionSummary) -> Self {
        Self {
            status: "OK".to_string(),
            error_message: None,
            rows_written: Some(summary.rows_written),
            sheet_created: Some(summary.sheet_created),
        }
    }

    /// Failure body carrying the error kind and message.
    pub fn error(err: &SheetError) -> Self {
        Self {
            status: err.kind().code().to_string(),
            error_message: Some(err.message().to_string()),
            rows_written: None,
            sheet_created: None,
        }
    }
}
