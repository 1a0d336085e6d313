use async_trait::async_trait;
use reqwest::Client;
use sheetsql::{Result, SheetError, Transport, TransportResponse};
use std::time::Duration;
use tracing::debug;

/// Options for the reqwest-backed transport
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub timeout: Duration,
    pub user_agent: String,
    /// Sent as `Authorization: Bearer ...` for private spreadsheets
    pub bearer_token: Option<String>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("sheetsql/{}", env!("CARGO_PKG_VERSION")),
            bearer_token: None,
        }
    }
}

impl TransportOptions {
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Table query transport over reqwest
pub struct ReqwestTransport {
    client: Client,
    bearer_token: Option<String>,
}

impl ReqwestTransport {
    pub fn new(options: TransportOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent)
            .build()
            .map_err(|e| SheetError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            bearer_token: options.bearer_token,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<TransportResponse> {
        let mut request = self.client.get(url).query(params);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SheetError::Transport(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SheetError::Transport(format!("Failed to read response: {}", e)))?;

        debug!("GET {} returned {} ({} bytes)", url, status, body.len());
        Ok(TransportResponse { status, body })
    }
}
