use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::types::*;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// GET-style transport to the table query endpoint
///
/// Network failures surface as errors from `get`. The returned status is
/// informational; query success is decided from the response body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET to `url` with the given query parameters
    async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<TransportResponse>;
}

/// Authenticated handle to the spreadsheet service
///
/// Covers the metadata and cell operations a worksheet needs besides
/// querying. Implementations own whatever credentials they were built with.
#[async_trait]
pub trait SheetsClient: Send + Sync {
    /// List every spreadsheet the authorized user can access
    async fn list_spreadsheet_files(&self) -> Result<Vec<SpreadsheetFile>>;

    /// Properties of every worksheet in a spreadsheet, in sheet order
    async fn fetch_sheet_metadata(&self, spreadsheet_id: &str) -> Result<Vec<WorksheetProperties>>;

    /// Values of a single row (1-based) of a worksheet, as displayed
    async fn row_values(
        &self,
        spreadsheet_id: &str,
        worksheet: &WorksheetProperties,
        row: usize,
    ) -> Result<Vec<String>>;

    /// Append rows after the last non-empty row of a worksheet
    async fn append_rows(
        &self,
        spreadsheet_id: &str,
        worksheet: &WorksheetProperties,
        rows: Vec<Vec<Value>>,
    ) -> Result<()>;
}

/// Produces an authorized client for one authentication method
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The method this provider handles
    fn auth_method(&self) -> AuthMethod;

    /// Build an authorized client from connection configuration
    async fn authorize(&self, config: &ConnectionConfig) -> Result<Arc<dyn SheetsClient>>;
}
