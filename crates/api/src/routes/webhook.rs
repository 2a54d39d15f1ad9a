//! Order webhook
//!
//! `POST /webhook/listening` with the customer id in the `userId` header and
//! one order object or an array of them as the body.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use ordersheet_domain::constants::WEBHOOK_TARGET_HEADER;
use ordersheet_domain::{OrderRecord, SheetError};
use tracing::debug;

use super::HandlerResponse;
use crate::context::AppContext;
use crate::errors::ApiError;

/// Record the delivered orders in the customer's worksheet.
///
/// # Errors
/// `InvalidRequest` for a missing or blank `userId` header or a malformed
/// body; otherwise whatever the ledger reports.
pub async fn receive_orders(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<HandlerResponse>, ApiError> {
    let target_id = target_id(&headers)?;
    let orders = parse_orders(&body)?;
    debug!(worksheet = target_id, orders = orders.len(), "webhook received");

    let summary = ctx.ledger().submit_batch(&orders, target_id).await?;
    Ok(Json(HandlerResponse::ok(&summary)))
}

fn target_id(headers: &HeaderMap) -> Result<&str, SheetError> {
    let value = headers
        .get(WEBHOOK_TARGET_HEADER)
        .ok_or_else(|| SheetError::invalid_request("Missing userId header"))?;
    let target = value
        .to_str()
        .map_err(|_| SheetError::invalid_request("userId header is not valid text"))?
        .trim();

    if target.is_empty() {
        return Err(SheetError::invalid_request("userId header must not be blank"));
    }
    Ok(target)
}

/// Parse one order or an array of orders.
///
/// Untagged enums buffer the input and lose the literal decimal text, so the
/// shape is picked from the first significant byte instead.
fn parse_orders(body: &[u8]) -> Result<Vec<OrderRecord>, SheetError> {
    let is_array = body.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'[');

    let parsed = if is_array {
        serde_json::from_slice::<Vec<OrderRecord>>(body)
    } else {
        serde_json::from_slice::<OrderRecord>(body).map(|order| vec![order])
    };

    parsed.map_err(|err| SheetError::invalid_request(format!("Malformed order payload: {err}")))
}
