//! Google Sheets v4 sink
//!
//! Upsert sequence for one tab:
//! 1. `GET spreadsheets/{id}?fields=sheets.properties.title` to see whether the tab exists
//! 2. `POST spreadsheets/{id}:batchUpdate` with `addSheet` (1000×26 grid) when it does not,
//!    or `POST spreadsheets/{id}/values/{tab}:clear` when it does
//! 3. `PUT spreadsheets/{id}/values/{tab}!A1?valueInputOption=RAW` with header + rows
//!
//! Obtaining the OAuth access token is left to the caller.

use super::TabularSink;
use crate::config::ExportConfig;
use crate::error::{Error, Result};
use crate::types::Table;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const NEW_TAB_ROWS: u32 = 1000;
const NEW_TAB_COLUMNS: u32 = 26;

#[derive(Debug, Default, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// Sink writing tables into Google Sheets tabs
#[derive(Clone, Debug)]
pub struct SheetsSink {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl SheetsSink {
    /// Create a sink from export settings
    ///
    /// # Errors
    /// Returns error if no access token is configured or the HTTP client cannot be built
    pub fn new(config: &ExportConfig) -> Result<Self> {
        if config.access_token.trim().is_empty() {
            return Err(Error::Config {
                message: format!(
                    "Google Sheets access token is not set (use {})",
                    crate::config::ENV_SHEETS_ACCESS_TOKEN
                ),
                key: Some("export.access_token".into()),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {e}"),
                key: None,
            })?;

        Ok(Self {
            http,
            base_url: config.sheets_base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.trim().to_string(),
        })
    }

    fn spreadsheet_url(&self, spreadsheet_id: &str) -> String {
        format!(
            "{}/spreadsheets/{}",
            self.base_url,
            urlencoding::encode(spreadsheet_id)
        )
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> String {
        format!(
            "{}/values/{}",
            self.spreadsheet_url(spreadsheet_id),
            urlencoding::encode(range)
        )
    }

    async fn tab_exists(&self, spreadsheet_id: &str, tab: &str) -> Result<bool> {
        let url = self.spreadsheet_url(spreadsheet_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("fields", "sheets.properties.title")])
            .send()
            .await?;
        let response = check(response, "GET", &url).await?;
        let meta: SpreadsheetMeta = response.json().await?;
        Ok(meta.sheets.iter().any(|s| s.properties.title == tab))
    }

    async fn add_tab(&self, spreadsheet_id: &str, tab: &str) -> Result<()> {
        let url = format!("{}:batchUpdate", self.spreadsheet_url(spreadsheet_id));
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": tab,
                        "gridProperties": {
                            "rowCount": NEW_TAB_ROWS,
                            "columnCount": NEW_TAB_COLUMNS
                        }
                    }
                }
            }]
        });
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        check(response, "POST", &url).await?;
        tracing::info!(spreadsheet_id, tab, "created tab");
        Ok(())
    }

    async fn clear_tab(&self, spreadsheet_id: &str, tab: &str) -> Result<()> {
        let url = format!("{}:clear", self.values_url(spreadsheet_id, &quote_tab(tab)));
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&json!({}))
            .send()
            .await?;
        check(response, "POST", &url).await?;
        tracing::debug!(spreadsheet_id, tab, "cleared tab");
        Ok(())
    }

    async fn write_values(&self, spreadsheet_id: &str, tab: &str, table: &Table) -> Result<()> {
        let range = format!("{}!A1", quote_tab(tab));
        let url = self.values_url(spreadsheet_id, &range);
        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": table.to_string_grid(),
        });
        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.access_token)
            .query(&[("valueInputOption", "RAW")])
            .json(&body)
            .send()
            .await?;
        check(response, "PUT", &url).await?;
        Ok(())
    }
}

#[async_trait]
impl TabularSink for SheetsSink {
    async fn upsert(&self, destination: &str, tab: &str, table: &Table) -> Result<()> {
        if self.tab_exists(destination, tab).await? {
            self.clear_tab(destination, tab).await?;
        } else {
            self.add_tab(destination, tab).await?;
        }
        self.write_values(destination, tab, table).await?;
        tracing::info!(
            spreadsheet_id = destination,
            tab,
            rows = table.len(),
            "exported table"
        );
        Ok(())
    }
}

/// A1-notation sheet reference: single-quoted, inner quotes doubled
fn quote_tab(tab: &str) -> String {
    format!("'{}'", tab.replace('\'', "''"))
}

async fn check(response: reqwest::Response, method: &str, url: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Sink(format!("{method} {url} returned {status}: {body}")))
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use wiremock::matchers::{body_json, header, method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sink(server: &MockServer) -> SheetsSink {
        SheetsSink::new(&ExportConfig {
            sheets_base_url: server.uri(),
            access_token: "ya29.test".into(),
            ..ExportConfig::default()
        })
        .unwrap()
    }

    fn sample_table() -> Table {
        let mut table = Table::new(["task_id", "tags", "parent"]);
        table.push_row(vec![json!("1"), json!(["a", "b"]), Value::Null]);
        table
    }

    async fn mount_meta(server: &MockServer, titles: &[&str]) {
        let sheets: Vec<_> = titles
            .iter()
            .map(|t| json!({"properties": {"title": t}}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/spreadsheets/sheet-1"))
            .and(header("authorization", "Bearer ya29.test"))
            .and(query_param("fields", "sheets.properties.title"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sheets": sheets})))
            .mount(server)
            .await;
    }

    async fn mount_write(server: &MockServer) {
        Mock::given(method("PUT"))
            .and(path_regex(r"^/spreadsheets/sheet-1/values/.+A1$"))
            .and(query_param("valueInputOption", "RAW"))
            .and(body_json(json!({
                "range": "'01-2025'!A1",
                "majorDimension": "ROWS",
                "values": [["task_id", "tags", "parent"], ["1", "a, b", ""]]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn missing_tab_is_created_then_written() {
        let server = MockServer::start().await;
        mount_meta(&server, &["Sheet1"]).await;
        Mock::given(method("POST"))
            .and(path("/spreadsheets/sheet-1:batchUpdate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path_regex(r":clear$"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        mount_write(&server).await;

        sink(&server)
            .upsert("sheet-1", "01-2025", &sample_table())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn existing_tab_is_cleared_then_written() {
        let server = MockServer::start().await;
        mount_meta(&server, &["Sheet1", "01-2025"]).await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/spreadsheets/sheet-1/values/.+:clear$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/spreadsheets/sheet-1:batchUpdate"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        mount_write(&server).await;

        sink(&server)
            .upsert("sheet-1", "01-2025", &sample_table())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn api_error_surfaces_as_sink_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/spreadsheets/sheet-1"))
            .respond_with(ResponseTemplate::new(403).set_body_string("PERMISSION_DENIED"))
            .mount(&server)
            .await;

        let err = sink(&server)
            .upsert("sheet-1", "01-2025", &sample_table())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "sink_error");
        assert!(err.to_string().contains("PERMISSION_DENIED"));
    }

    #[test]
    fn requires_access_token() {
        let err = SheetsSink::new(&ExportConfig::default()).unwrap_err();
        assert_eq!(err.kind(), "config_error");
    }

    #[test]
    fn tab_quoting_doubles_single_quotes() {
        assert_eq!(quote_tab("01-2025"), "'01-2025'");
        assert_eq!(quote_tab("Ana's"), "'Ana''s'");
    }
}
