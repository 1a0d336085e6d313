pub mod browse;
pub mod query;

pub use browse::{ColumnsCommand, SpreadsheetsCommand, WorksheetsCommand};
pub use query::{CountCommand, QueryCommand};

use clap::Args;
use sheetsql::{
    AuthRegistry, Connection, ConnectionConfig, MissPolicy, SheetsClient, Worksheet, TQ_BASE_URL,
};
use sheetsql_http::{
    register_token_providers, ReqwestTransport, TransportOptions, ACCESS_TOKEN_OPTION,
};
use std::sync::Arc;
use tracing::debug;

/// Arguments shared by every command that talks to the API
#[derive(Args, Clone)]
pub struct ConnectionArgs {
    /// OAuth access token for API and query requests
    #[arg(long, env = "SHEETSQL_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    /// Authentication method (oauth, service_account)
    #[arg(long = "auth", default_value = "oauth", env = "SHEETSQL_AUTH")]
    auth_method: String,

    /// Table query endpoint
    #[arg(long, default_value = TQ_BASE_URL, env = "SHEETSQL_ENDPOINT")]
    endpoint: String,
}

impl ConnectionArgs {
    fn config(&self) -> ConnectionConfig {
        ConnectionConfig::new(&self.auth_method)
            .with_endpoint(&self.endpoint)
            .with_on_miss(MissPolicy::FetchAndCache)
            .with_option(ACCESS_TOKEN_OPTION, &self.access_token)
    }

    /// Authorized API client for the configured method
    async fn client(&self) -> anyhow::Result<Arc<dyn SheetsClient>> {
        let registry = AuthRegistry::new();
        register_token_providers(&registry).await;

        let config = self.config();
        let provider = registry.provider(config.auth_method()?).await?;
        Ok(provider.authorize(&config).await?)
    }

    /// Connection that opens spreadsheets on first lookup
    async fn connect(&self) -> anyhow::Result<Connection> {
        let client = self.client().await?;
        let transport = ReqwestTransport::new(
            TransportOptions::default().with_bearer_token(&self.access_token),
        )?;

        debug!("Connecting to {}", self.endpoint);
        Ok(Connection::from_spreadsheets(
            client,
            Arc::new(transport),
            self.config(),
            Vec::new(),
        ))
    }

    async fn worksheet(&self, key: &str, title: &str) -> anyhow::Result<Arc<Worksheet>> {
        let conn = self.connect().await?;
        let spreadsheet = conn.get_spreadsheet(key).await?;
        Ok(spreadsheet.get_worksheet(title).await?)
    }
}
