//! Google Sheets Table Store
//!
//! [`TableStore`] over the Sheets API v4 `values` endpoints. Each tab of the
//! spreadsheet is one table; its first row is the header.
//!
//! Requests are sent once with the client's default timeouts. Failures of any
//! kind, including non-2xx answers, surface as [`StoreError::Transport`].

pub mod auth;
pub mod config;
pub mod range;

use async_trait::async_trait;
use dealsheet_core::{StoreError, StoreResult};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{StoreOp, TableStore};
use auth::{bearer_header, ServiceAccountAuth};
pub use config::SheetsConfig;
use range::{row_range, table_range};

/// Written cells are stored verbatim as text. Sheets does not re-parse them,
/// so `"0105"` keeps its leading zero and `"=A1"` stays a string.
const VALUE_INPUT_OPTION: &str = "RAW";

/// `values` payload of the Sheets API, in both directions.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl ValueRange {
    fn single_row(row: Vec<String>) -> Self {
        Self {
            values: vec![row.into_iter().map(Value::String).collect()],
        }
    }
}

/// Sheets-backed store for one spreadsheet.
#[derive(Debug)]
pub struct SheetsTableStore {
    http: reqwest::Client,
    auth: ServiceAccountAuth,
    api_base: String,
    spreadsheet_id: String,
}

impl SheetsTableStore {
    /// Build a store from validated settings. Nothing is sent until the first
    /// call.
    pub fn new(config: &SheetsConfig) -> StoreResult<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| StoreError::configuration("http_client", e.to_string()))?;
        Ok(Self {
            http,
            auth: ServiceAccountAuth::new(config)?,
            api_base: config.api_base.clone(),
            spreadsheet_id: config.spreadsheet_id.clone(),
        })
    }

    /// Shorthand for `SheetsConfig::from_env` followed by [`Self::new`].
    pub fn from_env() -> StoreResult<Self> {
        Self::new(&SheetsConfig::from_env()?)
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    async fn send(
        &self,
        op: StoreOp,
        request: reqwest::RequestBuilder,
    ) -> StoreResult<reqwest::Response> {
        let token = self.auth.bearer_token(&self.http).await?;
        let response = request
            .header(reqwest::header::AUTHORIZATION, bearer_header(&token))
            .send()
            .await
            .map_err(|e| StoreError::transport(op.as_str(), e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            self.auth.invalidate().await;
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(op = %op, status = status.as_u16(), "Sheets request failed");
        Err(StoreError::transport(
            op.as_str(),
            format!("HTTP {}: {}", status.as_u16(), body),
        ))
    }
}

#[async_trait]
impl TableStore for SheetsTableStore {
    async fn read_rows(&self, table: &str) -> StoreResult<Vec<Vec<String>>> {
        let url = values_url(&self.api_base, &self.spreadsheet_id, &table_range(table), "", false)?;
        let response = self.send(StoreOp::ReadRows, self.http.get(url)).await?;
        let body: ValueRange = response
            .json()
            .await
            .map_err(|e| StoreError::transport(StoreOp::ReadRows.as_str(), e.to_string()))?;
        Ok(into_text_rows(body.values))
    }

    async fn append_row(&self, table: &str, row: Vec<String>) -> StoreResult<()> {
        let url = values_url(
            &self.api_base,
            &self.spreadsheet_id,
            &table_range(table),
            ":append",
            true,
        )?;
        let body = ValueRange::single_row(row);
        self.send(StoreOp::AppendRow, self.http.post(url).json(&body))
            .await?;
        Ok(())
    }

    async fn update_row(&self, table: &str, row_number: usize, row: Vec<String>) -> StoreResult<()> {
        if row_number == 0 {
            return Err(StoreError::transport(
                StoreOp::UpdateRow.as_str(),
                "row numbers start at 1",
            ));
        }
        let url = values_url(
            &self.api_base,
            &self.spreadsheet_id,
            &row_range(table, row_number),
            "",
            true,
        )?;
        let body = ValueRange::single_row(row);
        self.send(StoreOp::UpdateRow, self.http.put(url).json(&body))
            .await?;
        Ok(())
    }
}

/// `{api_base}/v4/spreadsheets/{id}/values/{range}{suffix}`, with the range
/// percent-encoded as a single path segment.
fn values_url(
    api_base: &str,
    spreadsheet_id: &str,
    range: &str,
    suffix: &str,
    write: bool,
) -> StoreResult<Url> {
    let mut url = Url::parse(api_base)
        .map_err(|e| StoreError::configuration("GOOGLE_SHEETS_API_BASE", e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| StoreError::configuration("GOOGLE_SHEETS_API_BASE", "cannot be a base URL"))?
        .pop_if_empty()
        .extend(["v4", "spreadsheets", spreadsheet_id, "values"])
        .push(&format!("{}{}", range, suffix));
    if write {
        url.query_pairs_mut()
            .append_pair("valueInputOption", VALUE_INPUT_OPTION);
    }
    Ok(url)
}

/// Cells as text. Formatted reads are already strings; anything else is
/// rendered the way it would print in a cell.
fn into_text_rows(values: Vec<Vec<Value>>) -> Vec<Vec<String>> {
    values
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect()
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_url_encodes_range_segment() {
        let url = values_url(
            "https://sheets.googleapis.com",
            "1AbC",
            &table_range("Quote Items"),
            "",
            false,
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/1AbC/values/'Quote%20Items'!A:ZZ"
        );
    }

    #[test]
    fn test_append_url_has_suffix_and_input_option() {
        let url = values_url(
            "https://sheets.googleapis.com/",
            "1AbC",
            &table_range("Deals"),
            ":append",
            true,
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/1AbC/values/Deals!A:ZZ:append?valueInputOption=RAW"
        );
    }

    #[test]
    fn test_update_url_targets_single_row() {
        let url = values_url("http://localhost:8080", "x", &row_range("Deals", 7), "", true).unwrap();
        assert_eq!(url.path(), "/v4/spreadsheets/x/values/Deals!A7:ZZ7");
        assert_eq!(url.query(), Some("valueInputOption=RAW"));
    }

    #[test]
    fn test_bad_api_base_is_configuration_error() {
        let err = values_url("not a url", "x", "Deals!A:ZZ", "", false).unwrap_err();
        assert!(matches!(err, StoreError::Configuration { .. }));
    }

    #[test]
    fn test_missing_values_reads_as_empty() {
        let body: ValueRange =
            serde_json::from_value(json!({"range": "Deals!A1:ZZ1000", "majorDimension": "ROWS"}))
                .unwrap();
        assert!(into_text_rows(body.values).is_empty());
    }

    #[test]
    fn test_non_string_cells_are_stringified() {
        let rows = into_text_rows(vec![vec![
            json!("D-1"),
            json!(1250),
            json!(12.5),
            json!(true),
            Value::Null,
        ]]);
        assert_eq!(rows, vec![vec!["D-1", "1250", "12.5", "TRUE", ""]]);
    }

    #[test]
    fn test_write_body_keeps_cells_as_strings() {
        let body = ValueRange::single_row(vec![
            "0105551234567".to_string(),
            "true".to_string(),
            "=SUM(A1:A2)".to_string(),
            String::new(),
        ]);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"values": [["0105551234567", "true", "=SUM(A1:A2)", ""]]})
        );
    }

    #[test]
    fn test_writes_are_not_reparsed() {
        for (suffix, url) in [
            (":append", table_range("Accounts")),
            ("", row_range("Accounts", 2)),
        ] {
            let url = values_url("https://sheets.googleapis.com", "1AbC", &url, suffix, true).unwrap();
            assert_eq!(url.query(), Some("valueInputOption=RAW"));
        }
    }
}
