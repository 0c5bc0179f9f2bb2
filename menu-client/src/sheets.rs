//! Spreadsheet values API client
//!
//! [`TableSource`] is the transport seam: the controller only ever sees raw
//! tables and single-row writes. [`SheetsClient`] implements it over HTTP,
//! [`SheetsService`] layers the record mapping on top.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mapping::{build_menu_row, map_menu_rows, map_order_rows, menu_row_range};
use crate::{ClientConfig, ClientError, ClientResult, ReadError, WriteError};
use shared::{MenuItem, MenuItemUpdate, Order, SHEET_MENU, SHEET_ORDERS, SheetConfig};

/// Raw two-dimensional table, header row first
pub type RawTable = Vec<Vec<String>>;

/// Tabular read/write transport
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Read a whole named table
    async fn read_table(&self, config: &SheetConfig, table: &str) -> Result<RawTable, ReadError>;

    /// Overwrite one row at `range` (e.g. `Menu!A2:G2`) with `values`
    async fn write_row(
        &self,
        config: &SheetConfig,
        range: &str,
        values: &[String],
    ) -> Result<(), WriteError>;
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct ValueRangeBody<'a> {
    values: [&'a [String]; 1],
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}

/// Pull `error.message` out of an API error body
async fn upstream_message(response: Response, fallback: &str) -> String {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<ApiErrorBody>(&text)
        .ok()
        .and_then(|body| body.error)
        .and_then(|detail| detail.message)
        .unwrap_or_else(|| fallback.to_string())
}

/// HTTP client for the spreadsheet values API
#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: Client,
    base_url: Url,
}

impl SheetsClient {
    /// Create a new spreadsheet client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = Url::parse(&config.sheets_base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", config.sheets_base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(config.sheets_base_url.clone()));
        }

        Ok(Self {
            client: config.build_http()?,
            base_url,
        })
    }

    /// `{base}/v4/spreadsheets/{id}/values/{range}`
    fn values_url(&self, spreadsheet_id: &str, range: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v4", "spreadsheets", spreadsheet_id, "values", range]);
        }
        url
    }
}

#[async_trait]
impl TableSource for SheetsClient {
    async fn read_table(&self, config: &SheetConfig, table: &str) -> Result<RawTable, ReadError> {
        let key = config.read_key().ok_or(ReadError::Unauthenticated)?;

        let mut url = self.values_url(&config.spreadsheet_id, table);
        url.query_pairs_mut().append_pair("key", key);

        tracing::debug!(table = %table, "Reading sheet");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = upstream_message(response, "Failed to fetch sheet").await;
            tracing::error!(table = %table, status = %status, error = %message, "Sheet read failed");
            return Err(ReadError::Upstream(message));
        }

        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| ReadError::InvalidResponse(e.to_string()))?;

        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn write_row(
        &self,
        config: &SheetConfig,
        range: &str,
        values: &[String],
    ) -> Result<(), WriteError> {
        let token = config.write_token().ok_or(WriteError::Unauthenticated)?;

        // RAW: cells are stored as typed, formulas are never evaluated
        let mut url = self.values_url(&config.spreadsheet_id, range);
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        tracing::debug!(range = %range, "Writing sheet row");
        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(&ValueRangeBody { values: [values] })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = upstream_message(response, "Update failed").await;
            tracing::error!(range = %range, status = %status, error = %message, "Sheet write failed");
            return Err(WriteError::Upstream(message));
        }

        Ok(())
    }
}

/// Typed access to the `Menu` and `Orders` tables
#[derive(Clone)]
pub struct SheetsService {
    source: Arc<dyn TableSource>,
}

impl SheetsService {
    pub fn new(source: Arc<dyn TableSource>) -> Self {
        Self { source }
    }

    pub async fn get_menu(&self, config: &SheetConfig) -> Result<Vec<MenuItem>, ReadError> {
        let rows = self.source.read_table(config, SHEET_MENU).await?;
        Ok(map_menu_rows(&rows))
    }

    /// Orders, newest first
    pub async fn get_orders(&self, config: &SheetConfig) -> Result<Vec<Order>, ReadError> {
        let rows = self.source.read_table(config, SHEET_ORDERS).await?;
        Ok(map_order_rows(&rows))
    }

    /// Overwrite the menu row at `position` with `original` merged with `delta`
    pub async fn update_menu_item(
        &self,
        config: &SheetConfig,
        position: usize,
        original: &MenuItem,
        delta: &MenuItemUpdate,
    ) -> Result<(), WriteError> {
        let range = menu_row_range(position);
        let row = build_menu_row(original, delta);
        self.source.write_row(config, &range, &row).await
    }
}
