//! Sheets v4 / Drive v3 implementation of [`SheetsClient`]
//!
//! Requests carry a pre-issued OAuth access token. Acquiring and refreshing
//! that token is left to the caller.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use sheetsql::{Result, SheetError, SheetsClient, SpreadsheetFile, WorksheetProperties};
use tracing::debug;

pub(crate) const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";
pub(crate) const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
    #[serde(default)]
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Spreadsheet client over the Google REST APIs
pub struct SheetsApiClient {
    client: Client,
    access_token: String,
    sheets_url: String,
    drive_url: String,
}

impl SheetsApiClient {
    /// Create a client using the public Google endpoints
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        Self::with_base_urls(access_token, SHEETS_API_BASE, DRIVE_API_BASE)
    }

    /// Create a client against custom API base URLs
    pub fn with_base_urls(
        access_token: impl Into<String>,
        sheets_url: impl Into<String>,
        drive_url: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| SheetError::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            access_token: access_token.into(),
            sheets_url: sheets_url.into().trim_end_matches('/').to_string(),
            drive_url: drive_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// A1 range covering whole rows of a worksheet, percent-encoded for a path
    fn range(title: &str, rows: Option<usize>) -> String {
        let quoted = format!("'{}'", title.replace('\'', "''"));
        let range = match rows {
            Some(row) => format!("{}!{}:{}", quoted, row, row),
            None => quoted,
        };
        urlencoding::encode(&range).into_owned()
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| SheetError::Client(format!("API request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SheetError::Client(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(SheetError::Client(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl SheetsClient for SheetsApiClient {
    async fn list_spreadsheet_files(&self) -> Result<Vec<SpreadsheetFile>> {
        let url = format!("{}/files", self.drive_url);
        let q = format!("mimeType='{}'", SPREADSHEET_MIME_TYPE);
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = vec![
                ("q", q.as_str()),
                ("pageSize", "1000"),
                ("fields", "nextPageToken, files(id, name)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.as_str()));
            }

            let page: FileList = self.send(self.client.get(&url).query(&query)).await?;
            files.extend(page.files.into_iter().map(|f| SpreadsheetFile {
                id: f.id,
                name: f.name,
            }));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("Listed {} spreadsheet files", files.len());
        Ok(files)
    }

    async fn fetch_sheet_metadata(&self, spreadsheet_id: &str) -> Result<Vec<WorksheetProperties>> {
        let url = format!("{}/spreadsheets/{}", self.sheets_url, spreadsheet_id);
        let metadata: SpreadsheetMetadata = self
            .send(self.client.get(&url).query(&[("fields", "sheets.properties")]))
            .await?;

        Ok(metadata
            .sheets
            .into_iter()
            .map(|s| WorksheetProperties {
                sheet_id: s.properties.sheet_id,
                title: s.properties.title,
                index: s.properties.index,
            })
            .collect())
    }

    async fn row_values(
        &self,
        spreadsheet_id: &str,
        worksheet: &WorksheetProperties,
        row: usize,
    ) -> Result<Vec<String>> {
        let url = format!(
            "{}/spreadsheets/{}/values/{}",
            self.sheets_url,
            spreadsheet_id,
            Self::range(&worksheet.title, Some(row))
        );
        let range: ValueRange = self
            .send(self.client.get(&url).query(&[("majorDimension", "ROWS")]))
            .await?;

        Ok(range
            .values
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|v| match v {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect())
    }

    async fn append_rows(
        &self,
        spreadsheet_id: &str,
        worksheet: &WorksheetProperties,
        rows: Vec<Vec<Value>>,
    ) -> Result<()> {
        let url = format!(
            "{}/spreadsheets/{}/values/{}:append",
            self.sheets_url,
            spreadsheet_id,
            Self::range(&worksheet.title, None)
        );
        let body = json!({ "majorDimension": "ROWS", "values": rows });

        let _: Value = self
            .send(
                self.client
                    .post(&url)
                    .query(&[("valueInputOption", "USER_ENTERED")])
                    .json(&body),
            )
            .await?;

        Ok(())
    }
}
