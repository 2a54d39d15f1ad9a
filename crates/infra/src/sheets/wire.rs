//! Sheets v4 request and response bodies.

use ordersheet_domain::{
    RemoteError, Row, StructuralRequest, WorksheetLayout, WorksheetProperties, WriteReceipt,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SpreadsheetResponse {
    #[serde(default)]
    pub sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SheetEntry {
    pub properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SheetProperties {
    #[serde(default)]
    pub sheet_id: Option<i64>,
    pub title: String,
}

impl From<SheetProperties> for WorksheetProperties {
    fn from(value: SheetProperties) -> Self {
        WorksheetProperties { sheet_id: value.sheet_id, title: value.title }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchUpdateRequest<'a> {
    pub requests: Vec<Request<'a>>,
}

impl<'a> BatchUpdateRequest<'a> {
    /// Wrap staged commands in a `batchUpdate` body.
    pub fn from_commands(commands: &'a [StructuralRequest]) -> Self {
        let requests = commands
            .iter()
            .map(|command| match command {
                StructuralRequest::AddWorksheet { title, layout } => Request {
                    add_sheet: AddSheet {
                        properties: NewSheetProperties { title, grid_properties: *layout },
                    },
                },
            })
            .collect();
        Self { requests }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Request<'a> {
    pub add_sheet: AddSheet<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddSheet<'a> {
    pub properties: NewSheetProperties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewSheetProperties<'a> {
    pub title: &'a str,
    pub grid_properties: WorksheetLayout,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BatchUpdateResponse {
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Reply {
    #[serde(default)]
    pub add_sheet: Option<AddSheetReply>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddSheetReply {
    pub properties: SheetProperties,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValueRange<'a> {
    pub range: &'a str,
    pub major_dimension: &'static str,
    pub values: &'a [Row],
}

impl<'a> ValueRange<'a> {
    /// Row-major value range for `range`.
    pub fn rows(range: &'a str, values: &'a [Row]) -> Self {
        Self { range, major_dimension: "ROWS", values }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateValuesResponse {
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_rows: Option<u32>,
}

impl From<UpdateValuesResponse> for WriteReceipt {
    fn from(value: UpdateValuesResponse) -> Self {
        WriteReceipt { updated_range: value.updated_range, updated_rows: value.updated_rows.unwrap_or(0) }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AppendValuesResponse {
    #[serde(default)]
    pub updates: Option<UpdateValuesResponse>,
}

/// Google's error envelope: `{"error":{"code":403,"message":"...","status":"PERMISSION_DENIED"}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Decode a non-success response body into a status error.
pub(crate) fn status_error(status: StatusCode, body: &str) -> RemoteError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => RemoteError::Status {
            code: status.as_u16(),
            status: envelope.error.status,
            message: envelope.error.message,
        },
        Err(_) => RemoteError::Status {
            code: status.as_u16(),
            status: status.canonical_reason().map(str::to_string),
            message: if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown status").to_string()
            } else {
                body.trim().to_string()
            },
        },
    }
}
