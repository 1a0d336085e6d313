use crate::config::ConnectionConfig;
use crate::error::{Result, SheetError};
use crate::traits::{SheetsClient, Transport};
use crate::types::{MissPolicy, WorksheetProperties};
use crate::worksheet::Worksheet;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// A named group of worksheets
pub struct Spreadsheet {
    id: String,
    config: ConnectionConfig,
    client: Arc<dyn SheetsClient>,
    transport: Arc<dyn Transport>,
    worksheets: RwLock<Vec<Arc<Worksheet>>>,
}

impl Spreadsheet {
    /// Open a spreadsheet, loading all of its worksheets from metadata
    pub async fn open(
        id: impl Into<String>,
        client: Arc<dyn SheetsClient>,
        transport: Arc<dyn Transport>,
        config: ConnectionConfig,
    ) -> Result<Self> {
        let id = id.into();
        let properties = client.fetch_sheet_metadata(&id).await?;
        debug!("Opened spreadsheet {} with {} worksheets", id, properties.len());

        Ok(Self::from_worksheets(id, properties, client, transport, config))
    }

    /// Build a spreadsheet from already known worksheet properties
    pub fn from_worksheets(
        id: impl Into<String>,
        properties: Vec<WorksheetProperties>,
        client: Arc<dyn SheetsClient>,
        transport: Arc<dyn Transport>,
        config: ConnectionConfig,
    ) -> Self {
        let id = id.into();
        let worksheets = properties
            .into_iter()
            .map(|p| {
                Arc::new(Worksheet::new(
                    id.clone(),
                    p,
                    client.clone(),
                    transport.clone(),
                    &config,
                ))
            })
            .collect();

        Self {
            id,
            config,
            client,
            transport,
            worksheets: RwLock::new(worksheets),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Titles of the known worksheets, in sheet order
    pub async fn worksheets(&self) -> Vec<String> {
        self.worksheets
            .read()
            .await
            .iter()
            .map(|w| w.title().to_string())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.worksheets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.worksheets.read().await.is_empty()
    }

    /// Get a worksheet by title
    ///
    /// A miss fails unless the configured miss policy is
    /// [`MissPolicy::FetchAndCache`], in which case metadata is fetched once,
    /// new worksheets are cached and the lookup is retried.
    pub async fn get_worksheet(&self, title: &str) -> Result<Arc<Worksheet>> {
        if let Some(worksheet) = self.find(title).await {
            return Ok(worksheet);
        }

        if self.config.on_miss == MissPolicy::FetchAndCache {
            debug!(
                "Worksheet '{}' not cached for spreadsheet {}, fetching metadata",
                title, self.id
            );
            self.refresh().await?;

            if let Some(worksheet) = self.find(title).await {
                return Ok(worksheet);
            }
        }

        Err(SheetError::worksheet_not_found(&self.id, title))
    }

    async fn find(&self, title: &str) -> Option<Arc<Worksheet>> {
        self.worksheets
            .read()
            .await
            .iter()
            .find(|w| w.title() == title)
            .cloned()
    }

    /// Cache worksheets that appeared since the spreadsheet was opened
    async fn refresh(&self) -> Result<()> {
        let properties = self.client.fetch_sheet_metadata(&self.id).await?;
        let mut worksheets = self.worksheets.write().await;

        for p in properties {
            if worksheets.iter().any(|w| w.id() == p.sheet_id) {
                continue;
            }
            debug!("Caching worksheet '{}' ({})", p.title, p.sheet_id);
            worksheets.push(Arc::new(Worksheet::new(
                self.id.clone(),
                p,
                self.client.clone(),
                self.transport.clone(),
                &self.config,
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for Spreadsheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spreadsheet")
            .field("id", &self.id)
            .field("on_miss", &self.config.on_miss)
            .finish_non_exhaustive()
    }
}
