use crate::columns::ColumnMap;
use crate::config::ConnectionConfig;
use crate::error::{Result, SheetError};
use crate::response::{handle_response, Rows};
use crate::traits::{SheetsClient, Transport};
use crate::types::{RowShape, WorksheetProperties};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// A single grid inside a spreadsheet
///
/// Rows are never stored; every query fetches them again. The header row is
/// re-read on each query so label changes are picked up.
pub struct Worksheet {
    spreadsheet_id: String,
    properties: WorksheetProperties,
    endpoint: String,
    client: Arc<dyn SheetsClient>,
    transport: Arc<dyn Transport>,
    default_row_shape: RwLock<RowShape>,
}

impl Worksheet {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        properties: WorksheetProperties,
        client: Arc<dyn SheetsClient>,
        transport: Arc<dyn Transport>,
        config: &ConnectionConfig,
    ) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            properties,
            endpoint: config.endpoint.clone(),
            client,
            transport,
            default_row_shape: RwLock::new(config.default_row_shape),
        }
    }

    /// Grid ID (`gid`)
    pub fn id(&self) -> i64 {
        self.properties.sheet_id
    }

    pub fn title(&self) -> &str {
        &self.properties.title
    }

    pub fn index(&self) -> usize {
        self.properties.index
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn properties(&self) -> &WorksheetProperties {
        &self.properties
    }

    /// Column labels from the first row
    pub async fn columns(&self) -> Result<Vec<String>> {
        self.client
            .row_values(&self.spreadsheet_id, &self.properties, 1)
            .await
    }

    pub async fn num_columns(&self) -> Result<usize> {
        Ok(self.columns().await?.len())
    }

    /// Mapping of column label to column identifier for the current header
    pub async fn column_label_id_map(&self) -> Result<ColumnMap> {
        Ok(ColumnMap::from_labels(self.columns().await?))
    }

    /// Row shape used by `query` when none is given
    pub async fn default_row_shape(&self) -> RowShape {
        *self.default_row_shape.read().await
    }

    pub async fn set_default_row_shape(&self, shape: RowShape) {
        *self.default_row_shape.write().await = shape;
    }

    /// Set the default row shape by name
    ///
    /// Unknown names fail with [`SheetError::InvalidRowShape`] and leave the
    /// current default in place.
    pub async fn set_default_row_shape_named(&self, name: &str) -> Result<()> {
        let shape: RowShape = name.parse()?;
        self.set_default_row_shape(shape).await;
        Ok(())
    }

    /// Run a table query written against column labels
    ///
    /// See <https://developers.google.com/chart/interactive/docs/querylanguage>.
    pub async fn query(&self, tq: &str, shape: Option<RowShape>) -> Result<Rows> {
        let columns = self.column_label_id_map().await?;
        let rewritten = columns.rewrite(tq)?;
        let gid = self.properties.sheet_id.to_string();

        let params = [
            ("key", self.spreadsheet_id.as_str()),
            ("tq", rewritten.as_str()),
            ("gid", gid.as_str()),
        ];

        debug!(
            "Querying worksheet '{}' ({}): {}",
            self.properties.title, gid, rewritten
        );

        let response = self.transport.get(&self.endpoint, &params).await?;
        debug!("Table query responded with status {}", response.status);

        let table = handle_response(&response.body)?;
        let shape = match shape {
            Some(shape) => shape,
            None => self.default_row_shape().await,
        };

        Ok(table.into_rows(shape))
    }

    /// Every row in the worksheet
    pub async fn all(&self) -> Result<Rows> {
        self.query("SELECT *", None).await
    }

    /// Number of data rows
    pub async fn count(&self) -> Result<Value> {
        let mut rows = self
            .query("SELECT COUNT(*)", Some(RowShape::Sequence))
            .await?;

        rows.next()
            .and_then(|row| row.into_values().into_iter().next())
            .ok_or_else(|| SheetError::malformed("count query returned no value"))
    }

    /// Append one row; it must have exactly one value per column
    pub async fn insert(&self, row: Vec<Value>) -> Result<()> {
        self.insert_many(vec![row]).await
    }

    /// Append several rows; nothing is written if any row has the wrong width
    pub async fn insert_many(&self, rows: Vec<Vec<Value>>) -> Result<()> {
        let expected = self.num_columns().await?;

        for (i, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(SheetError::RowLengthMismatch {
                    expected,
                    actual: row.len(),
                    row: i + 1,
                });
            }
        }

        let num_rows = rows.len();
        self.client
            .append_rows(&self.spreadsheet_id, &self.properties, rows)
            .await?;

        info!(
            "Inserted {} rows into worksheet '{}'",
            num_rows, self.properties.title
        );
        Ok(())
    }
}

impl fmt::Debug for Worksheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worksheet")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("properties", &self.properties)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
