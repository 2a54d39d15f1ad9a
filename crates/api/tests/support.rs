//! Shared helpers for `ordersheet-api` route tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use ordersheet_api::{router, AppContext, HandlerResponse};
use ordersheet_core::testing::{InMemorySpreadsheet, StaticHandleProvider};
use ordersheet_core::HandleProvider;
use tower::ServiceExt;

pub const SPREADSHEET_ID: &str = "customers-sheet";

/// A router backed by an in-memory spreadsheet.
pub fn app(sheet: InMemorySpreadsheet) -> (Router, Arc<InMemorySpreadsheet>, Arc<StaticHandleProvider>) {
    let sheet = Arc::new(sheet);
    let provider = Arc::new(StaticHandleProvider::new(sheet.clone()));
    (app_with(provider.clone()), sheet, provider)
}

pub fn app_with(handles: Arc<dyn HandleProvider>) -> Router {
    router(Arc::new(AppContext::with_handles(handles, SPREADSHEET_ID)))
}

pub fn webhook(user_id: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook/listening")
        .header("content-type", "application/json");
    if let Some(user_id) = user_id {
        builder = builder.header("userId", user_id);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Send one request and decode the `HandlerResponse` body.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HandlerResponse) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub fn order_json(id: &str, price: &str) -> String {
    format!(r#"{{"id":"{id}","productName":"Widget","quantity":3,"price":{price},"cost":4.50}}"#)
}
