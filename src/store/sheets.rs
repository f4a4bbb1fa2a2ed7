//! Remote spreadsheet client speaking the values REST surface
//! (`GET values/{range}`, `POST values/{range}:append`, `PUT values/{range}`).
//!
//! Calls are synchronous-per-request with no retry or backoff; a failed call
//! aborts the whole request. Numeric-looking cells are written as JSON
//! numbers so the workbook keeps real numbers in cost and stock columns.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{Sheet, StoreError, TabularStore};

pub struct SheetsStore {
    http: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    api_token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn cell_to_json(cell: &str) -> Value {
    // Mirror the store's USER_ENTERED coercion: plain numerics become numbers.
    if !cell.is_empty() {
        if let Ok(n) = cell.parse::<f64>() {
            if n.is_finite() {
                if let Some(num) = serde_json::Number::from_f64(n) {
                    return Value::Number(num);
                }
            }
        }
    }
    Value::String(cell.to_string())
}

impl SheetsStore {
    pub fn new(base_url: String, spreadsheet_id: String, api_token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id,
            api_token,
        }
    }

    fn values_url(&self, sheet: Sheet, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}!{}",
            self.base_url,
            self.spreadsheet_id,
            sheet.tab_name(),
            range
        )
    }

    async fn check(response: reqwest::Response, op: &str) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let cause = format!("{op} returned {status}: {body}");
        if op == "get" {
            Err(StoreError::Read(cause))
        } else {
            Err(StoreError::Write(cause))
        }
    }
}

#[async_trait::async_trait]
impl TabularStore for SheetsStore {
    async fn get_rows(&self, sheet: Sheet, range: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let url = self.values_url(sheet, range);
        debug!(tab = sheet.tab_name(), range, "reading rows");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;
        let body: ValueRange = Self::check(response, "get")
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;

        Ok(body
            .values
            .iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect())
    }

    async fn append_row(&self, sheet: Sheet, row: Vec<String>) -> Result<(), StoreError> {
        let url = format!("{}:append", self.values_url(sheet, "A:A"));
        let values: Vec<Value> = row.iter().map(|c| cell_to_json(c)).collect();
        debug!(tab = sheet.tab_name(), "appending row");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_token)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&json!({ "values": [values] }))
            .send()
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;
        Self::check(response, "append").await?;
        Ok(())
    }

    async fn update_range(
        &self,
        sheet: Sheet,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<(), StoreError> {
        let url = self.values_url(sheet, range);
        let matrix: Vec<Vec<Value>> = values
            .iter()
            .map(|row| row.iter().map(|c| cell_to_json(c)).collect())
            .collect();
        debug!(tab = sheet.tab_name(), range, "updating range");
        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.api_token)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "values": matrix }))
            .send()
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;
        Self::check(response, "update").await?;
        Ok(())
    }
}
