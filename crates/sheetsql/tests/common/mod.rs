//! In-memory collaborators for driving connections, spreadsheets and
//! worksheets without a network.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use sheetsql::{
    AuthMethod, AuthProvider, ConnectionConfig, Result, SheetError, SheetsClient,
    SpreadsheetFile, Transport, TransportResponse, WorksheetProperties,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const VALID_QUERY_RESPONSE: &str = r#"/*O_o*/
google.visualization.Query.setResponse({"version":"0.6","reqId":"0","status":"ok","sig":"1094779711","table":{"cols":[{"id":"sum-A","label":"sum test","type":"number"},{"id":"sum-B","label":"sum test2","type":"number"}],"rows":[{"c":[{"v":15.0},{"v":40.0}]}],"parsedNumHeaders":0}});"#;

pub const INVALID_QUERY_RESPONSE: &str = r#"/*O_o*/
google.visualization.Query.setResponse({"version":"0.6","reqId":"0","status":"error","errors":[{"reason":"invalid_query","message":"INVALID_QUERY","detailed_message":"Invalid query: NO_COLUMN: D"}]});"#;

pub const COUNT_RESPONSE: &str = r#"/*O_o*/
google.visualization.Query.setResponse({"version":"0.6","reqId":"0","status":"ok","sig":"1","table":{"cols":[{"id":"count-A","label":"count test","type":"number"}],"rows":[{"c":[{"v":42.0}]}],"parsedNumHeaders":0}});"#;

/// Spreadsheet service backed by maps
#[derive(Default)]
pub struct FakeClient {
    files: Mutex<Vec<SpreadsheetFile>>,
    sheets: Mutex<HashMap<String, Vec<WorksheetProperties>>>,
    headers: Mutex<HashMap<(String, i64), Vec<String>>>,
    pub appended: Mutex<Vec<Vec<Value>>>,
    pub metadata_calls: AtomicUsize,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a spreadsheet with worksheets titled as given, gids counting from 0
    pub fn with_spreadsheet(self, id: &str, titles: &[&str]) -> Self {
        self.files.lock().unwrap().push(SpreadsheetFile {
            id: id.to_string(),
            name: format!("{} name", id),
        });
        self.sheets.lock().unwrap().insert(
            id.to_string(),
            titles
                .iter()
                .enumerate()
                .map(|(i, t)| WorksheetProperties::new(i as i64, *t).with_index(i))
                .collect(),
        );
        self
    }

    /// Add a worksheet to the remote side only
    pub fn add_remote_worksheet(&self, spreadsheet_id: &str, title: &str) {
        let mut sheets = self.sheets.lock().unwrap();
        let list = sheets.entry(spreadsheet_id.to_string()).or_default();
        let next = list.len();
        list.push(WorksheetProperties::new(next as i64, title).with_index(next));
    }

    pub fn set_header(&self, spreadsheet_id: &str, sheet_id: i64, labels: &[&str]) {
        self.headers.lock().unwrap().insert(
            (spreadsheet_id.to_string(), sheet_id),
            labels.iter().map(|l| l.to_string()).collect(),
        );
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SheetsClient for FakeClient {
    async fn list_spreadsheet_files(&self) -> Result<Vec<SpreadsheetFile>> {
        Ok(self.files.lock().unwrap().clone())
    }

    async fn fetch_sheet_metadata(&self, spreadsheet_id: &str) -> Result<Vec<WorksheetProperties>> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.sheets
            .lock()
            .unwrap()
            .get(spreadsheet_id)
            .cloned()
            .ok_or_else(|| SheetError::Client(format!("Requested entity was not found: {}", spreadsheet_id)))
    }

    async fn row_values(
        &self,
        spreadsheet_id: &str,
        worksheet: &WorksheetProperties,
        row: usize,
    ) -> Result<Vec<String>> {
        assert_eq!(row, 1, "only the header row is read");
        Ok(self
            .headers
            .lock()
            .unwrap()
            .get(&(spreadsheet_id.to_string(), worksheet.sheet_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn append_rows(
        &self,
        _spreadsheet_id: &str,
        _worksheet: &WorksheetProperties,
        rows: Vec<Vec<Value>>,
    ) -> Result<()> {
        self.appended.lock().unwrap().extend(rows);
        Ok(())
    }
}

/// A recorded transport call
#[derive(Debug, Clone)]
pub struct Call {
    pub url: String,
    pub params: HashMap<String, String>,
}

/// Transport answering every GET with the same body
pub struct FakeTransport {
    body: Mutex<String>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn new(body: &str) -> Self {
        Self {
            body: Mutex::new(body.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_body(&self, body: &str) {
        *self.body.lock().unwrap() = body.to_string();
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Call {
        self.calls.lock().unwrap().last().cloned().expect("no calls made")
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<TransportResponse> {
        self.calls.lock().unwrap().push(Call {
            url: url.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        Ok(TransportResponse::new(200, self.body.lock().unwrap().clone()))
    }
}

/// Provider handing out a fixed client
pub struct FakeProvider {
    method: AuthMethod,
    client: Arc<FakeClient>,
    pub authorized: AtomicUsize,
}

impl FakeProvider {
    pub fn new(method: AuthMethod, client: Arc<FakeClient>) -> Self {
        Self {
            method,
            client,
            authorized: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AuthProvider for FakeProvider {
    fn auth_method(&self) -> AuthMethod {
        self.method
    }

    async fn authorize(&self, _config: &ConnectionConfig) -> Result<Arc<dyn SheetsClient>> {
        self.authorized.fetch_add(1, Ordering::SeqCst);
        let client: Arc<dyn SheetsClient> = self.client.clone();
        Ok(client)
    }
}

/// Two spreadsheets: two and three worksheets
pub fn sample_client() -> FakeClient {
    FakeClient::new()
        .with_spreadsheet("spreadsheet_1", &["worksheet_1", "worksheet_2"])
        .with_spreadsheet("spreadsheet_2", &["worksheet_1", "worksheet_2", "worksheet_3"])
}
