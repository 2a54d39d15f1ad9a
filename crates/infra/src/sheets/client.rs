//! Google Sheets v4 REST client
//!
//! Implements [`SpreadsheetClient`] over [`HttpClient`]. Every request is
//! authorized with a bearer token from an [`AccessTokenProvider`]; non-2xx
//! responses are decoded from Google's error envelope.

use std::sync::Arc;

use async_trait::async_trait;
use ordersheet_core::SpreadsheetClient;
use ordersheet_domain::constants::{INSERT_ROWS, VALUE_INPUT_RAW};
use ordersheet_domain::{
    RemoteError, Row, SpreadsheetMetadata, StructuralRequest, WorksheetProperties, WriteReceipt,
};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::wire::{
    status_error, AppendValuesResponse, BatchUpdateRequest, BatchUpdateResponse,
    SpreadsheetResponse, UpdateValuesResponse, ValueRange,
};
use crate::auth::AccessTokenProvider;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Authenticated Sheets client bound to one API base URL.
pub struct GoogleSheetsClient {
    http: HttpClient,
    tokens: Arc<dyn AccessTokenProvider>,
    base_url: String,
}

impl GoogleSheetsClient {
    /// Client sending requests under `base_url` with tokens from `tokens`.
    pub fn new(
        http: HttpClient,
        tokens: Arc<dyn AccessTokenProvider>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, tokens, base_url }
    }

    fn spreadsheet_url(&self, spreadsheet_id: &str) -> String {
        format!("{}/v4/spreadsheets/{}", self.base_url, urlencoding::encode(spreadsheet_id))
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> String {
        format!("{}/values/{}", self.spreadsheet_url(spreadsheet_id), urlencoding::encode(range))
    }

    async fn authorized(&self, method: Method, url: &str) -> Result<RequestBuilder, RemoteError> {
        let token = self
            .tokens
            .access_token()
            .await
            .map_err(|err| RemoteError::from(InfraError::from(err)))?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn execute<T>(&self, request: RequestBuilder) -> Result<T, RemoteError>
    where
        T: DeserializeOwned + Default,
    {
        let response = self.http.send(request).await?;
        let status = response.status();
        let body = response.text().await.map_err(|err| RemoteError::from(InfraError::from(err)))?;

        if !status.is_success() {
            let err = status_error(status, &body);
            warn!(status = status.as_u16(), error = %err, "sheets request failed");
            return Err(err);
        }

        if body.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&body).map_err(|err| InfraError::from(err).into())
    }
}

#[async_trait]
impl SpreadsheetClient for GoogleSheetsClient {
    #[instrument(skip(self))]
    async fn get_metadata(&self, spreadsheet_id: &str) -> Result<SpreadsheetMetadata, RemoteError> {
        let url = format!("{}?fields=sheets.properties", self.spreadsheet_url(spreadsheet_id));
        let request = self.authorized(Method::GET, &url).await?;
        let response: SpreadsheetResponse = self.execute(request).await?;

        let worksheets: Vec<WorksheetProperties> =
            response.sheets.into_iter().map(|sheet| sheet.properties.into()).collect();
        debug!(worksheets = worksheets.len(), "spreadsheet metadata fetched");
        Ok(SpreadsheetMetadata { spreadsheet_id: spreadsheet_id.to_string(), worksheets })
    }

    #[instrument(skip(self, requests), fields(requests = requests.len()))]
    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: &[StructuralRequest],
    ) -> Result<Vec<WorksheetProperties>, RemoteError> {
        let url = format!("{}:batchUpdate", self.spreadsheet_url(spreadsheet_id));
        let body = BatchUpdateRequest::from_commands(requests);
        let request = self.authorized(Method::POST, &url).await?.json(&body);
        let response: BatchUpdateResponse = self.execute(request).await?;

        Ok(response
            .replies
            .into_iter()
            .filter_map(|reply| reply.add_sheet)
            .map(|added| added.properties.into())
            .collect())
    }

    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Row],
    ) -> Result<WriteReceipt, RemoteError> {
        let url = format!(
            "{}?valueInputOption={VALUE_INPUT_RAW}",
            self.values_url(spreadsheet_id, range)
        );
        let request =
            self.authorized(Method::PUT, &url).await?.json(&ValueRange::rows(range, rows));
        let response: UpdateValuesResponse = self.execute(request).await?;
        Ok(response.into())
    }

    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Row],
    ) -> Result<WriteReceipt, RemoteError> {
        let url = format!(
            "{}:append?valueInputOption={VALUE_INPUT_RAW}&insertDataOption={INSERT_ROWS}",
            self.values_url(spreadsheet_id, range)
        );
        let request =
            self.authorized(Method::POST, &url).await?.json(&ValueRange::rows(range, rows));
        let response: AppendValuesResponse = self.execute(request).await?;
        Ok(response.updates.map(WriteReceipt::from).unwrap_or_default())
    }
}
