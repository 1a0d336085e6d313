use crate::config::ConnectionConfig;
use crate::error::{Result, SheetError};
use crate::registry::AuthRegistry;
use crate::spreadsheet::Spreadsheet;
use crate::traits::{SheetsClient, Transport};
use crate::types::MissPolicy;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// An authorized session over every spreadsheet the user can reach
pub struct Connection {
    config: ConnectionConfig,
    client: Arc<dyn SheetsClient>,
    transport: Arc<dyn Transport>,
    spreadsheets: RwLock<Vec<Arc<Spreadsheet>>>,
}

impl Connection {
    /// Authorize with the configured method and open every listed spreadsheet
    ///
    /// Fails with [`SheetError::UnsupportedAuthMethod`] when the method is
    /// unknown or the registry has no provider for it.
    pub async fn connect(
        registry: &AuthRegistry,
        config: ConnectionConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let method = config.auth_method()?;
        let provider = registry.provider(method).await?;

        debug!("Connecting with {}", config.connection_string());
        let client = provider.authorize(&config).await?;

        Self::open(client, transport, config).await
    }

    /// Open every spreadsheet an already authorized client lists
    pub async fn open(
        client: Arc<dyn SheetsClient>,
        transport: Arc<dyn Transport>,
        config: ConnectionConfig,
    ) -> Result<Self> {
        let files = client.list_spreadsheet_files().await?;
        let mut spreadsheets = Vec::with_capacity(files.len());

        for file in files {
            debug!("Opening spreadsheet '{}' ({})", file.name, file.id);
            let spreadsheet =
                Spreadsheet::open(file.id, client.clone(), transport.clone(), config.clone())
                    .await?;
            spreadsheets.push(spreadsheet);
        }

        info!("Connected with {} spreadsheets", spreadsheets.len());
        Ok(Self::from_spreadsheets(client, transport, config, spreadsheets))
    }

    /// Build a connection from spreadsheets that are already open
    pub fn from_spreadsheets(
        client: Arc<dyn SheetsClient>,
        transport: Arc<dyn Transport>,
        config: ConnectionConfig,
        spreadsheets: Vec<Spreadsheet>,
    ) -> Self {
        Self {
            config,
            client,
            transport,
            spreadsheets: RwLock::new(spreadsheets.into_iter().map(Arc::new).collect()),
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// IDs of the known spreadsheets, in listing order
    pub async fn spreadsheets(&self) -> Vec<String> {
        self.spreadsheets
            .read()
            .await
            .iter()
            .map(|s| s.id().to_string())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.spreadsheets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.spreadsheets.read().await.is_empty()
    }

    /// Get a spreadsheet by ID
    ///
    /// With [`MissPolicy::FetchAndCache`] an unknown ID is opened directly,
    /// cached and returned.
    pub async fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<Arc<Spreadsheet>> {
        if let Some(spreadsheet) = self.find(spreadsheet_id).await {
            return Ok(spreadsheet);
        }

        if self.config.on_miss == MissPolicy::Fail {
            return Err(SheetError::SpreadsheetNotFound(spreadsheet_id.to_string()));
        }

        debug!("Spreadsheet {} not cached, opening", spreadsheet_id);
        let opened = Arc::new(
            Spreadsheet::open(
                spreadsheet_id,
                self.client.clone(),
                self.transport.clone(),
                self.config.clone(),
            )
            .await?,
        );

        let mut spreadsheets = self.spreadsheets.write().await;
        if let Some(existing) = spreadsheets.iter().find(|s| s.id() == spreadsheet_id) {
            return Ok(existing.clone());
        }
        spreadsheets.push(opened.clone());
        Ok(opened)
    }

    async fn find(&self, spreadsheet_id: &str) -> Option<Arc<Spreadsheet>> {
        self.spreadsheets
            .read()
            .await
            .iter()
            .find(|s| s.id() == spreadsheet_id)
            .cloned()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("config", &self.config.connection_string())
            .finish_non_exhaustive()
    }
}
