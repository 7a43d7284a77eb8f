//! Google Sheets values API client
//!
//! Reads whole worksheets through `GET /v4/spreadsheets/{id}/values/{sheet}`
//! and converts the value matrix into header-keyed rows, the way gspread's
//! `get_all_records` does. Requests are authorised with a pre-issued bearer
//! token or an API key; obtaining the token is the caller's concern.

use crate::{model::Row, source::DataSource, Error, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Public Sheets API endpoint
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";

/// Default per-request timeout
pub const DEFAULT_SHEETS_TIMEOUT: Duration = Duration::from_secs(10);

/// How requests are authorised
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetsAuth {
    /// `Authorization: Bearer <token>`
    BearerToken(String),
    /// `?key=<api key>` (public sheets only)
    ApiKey(String),
    /// No credentials (useful against local test servers)
    Anonymous,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// HTTP client for the Sheets values API
#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: reqwest::Client,
    api_base: String,
    auth: SheetsAuth,
}

impl SheetsClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `api_base` - API root, normally `DEFAULT_SHEETS_API_BASE`
    /// * `auth` - request authorisation
    /// * `timeout` - per-request timeout
    pub fn new(api_base: impl Into<String>, auth: SheetsAuth, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Source(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: api_base.into(),
            auth,
        })
    }

    /// Build the request URL, percent-encoding the sheet name
    fn values_url(&self, sheet_id: &str, sheet_name: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.api_base)
            .map_err(|e| Error::Source(format!("Invalid Sheets API base {}: {}", self.api_base, e)))?;

        url.path_segments_mut()
            .map_err(|_| Error::Source(format!("Invalid Sheets API base {}", self.api_base)))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", sheet_id, "values", sheet_name]);

        Ok(url)
    }
}

#[async_trait]
impl DataSource for SheetsClient {
    async fn fetch_rows(&self, source_id: &str, table_name: &str) -> Result<Vec<Row>> {
        if source_id.is_empty() {
            return Err(Error::Source(format!(
                "No spreadsheet configured for {}",
                table_name
            )));
        }

        let url = self.values_url(source_id, table_name)?;
        info!("Fetching sheet {} from spreadsheet {}", table_name, source_id);
        debug!("Sheets request URL: {}", url);

        let mut request = self.client.get(url);
        request = match &self.auth {
            SheetsAuth::BearerToken(token) => request.bearer_auth(token),
            SheetsAuth::ApiKey(key) => request.query(&[("key", key)]),
            SheetsAuth::Anonymous => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| Error::Source(format!("Request to Sheets API failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Source(format!("Failed to read Sheets response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Source(format!("HTTP {}: {}", status, text)));
        }

        let range: ValueRange = serde_json::from_str(&text)?;
        let rows = values_to_rows(range.values);
        debug!("Sheet {} returned {} records", table_name, rows.len());
        Ok(rows)
    }
}

/// Convert a value matrix into header-keyed rows
///
/// The first row holds the headers. Short rows are padded with `""` and
/// columns with an empty header are skipped. Blank rows between records are
/// kept as records of empty strings, so every data row below the header
/// yields exactly one record.
pub fn values_to_rows(values: Vec<Vec<Value>>) -> Vec<Row> {
    let mut matrix = values.into_iter();
    let headers: Vec<String> = match matrix.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| crate::model::row::cell_to_string(cell).trim().to_string())
            .collect(),
        None => return Vec::new(),
    };

    matrix
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| !header.is_empty())
                .map(|(i, header)| {
                    let value = cells
                        .get(i)
                        .cloned()
                        .unwrap_or_else(|| Value::String(String::new()));
                    (header.clone(), value)
                })
                .collect::<Row>()
        })
        .collect()
}

/// Extract a spreadsheet ID from a share URL
///
/// Accepts `https://docs.google.com/spreadsheets/d/<ID>/edit...` or a bare ID.
/// Returns `None` for anything else.
pub fn extract_sheet_id(input: &str) -> Option<String> {
    let input = input.trim();
    let url_pattern = Regex::new(r"/spreadsheets/d/([a-zA-Z0-9_-]+)").ok()?;
    if let Some(captures) = url_pattern.captures(input) {
        return captures.get(1).map(|m| m.as_str().to_string());
    }

    let id_pattern = Regex::new(r"^[a-zA-Z0-9_-]{20,}$").ok()?;
    if id_pattern.is_match(input) {
        Some(input.to_string())
    } else {
        None
    }
}
