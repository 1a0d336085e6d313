use crate::client::{SheetsApiClient, DRIVE_API_BASE, SHEETS_API_BASE};
use async_trait::async_trait;
use sheetsql::{
    AuthMethod, AuthProvider, AuthRegistry, ConnectionConfig, Result, SheetError, SheetsClient,
};
use std::sync::Arc;
use tracing::debug;

/// Option holding the pre-issued OAuth access token
pub const ACCESS_TOKEN_OPTION: &str = "access_token";
/// Optional override of the Sheets API base URL
pub const SHEETS_API_URL_OPTION: &str = "sheets_api_url";
/// Optional override of the Drive API base URL
pub const DRIVE_API_URL_OPTION: &str = "drive_api_url";

/// Authorizes with an access token already obtained for the given method
pub struct TokenAuthProvider {
    method: AuthMethod,
}

impl TokenAuthProvider {
    pub fn new(method: AuthMethod) -> Self {
        Self { method }
    }
}

#[async_trait]
impl AuthProvider for TokenAuthProvider {
    fn auth_method(&self) -> AuthMethod {
        self.method
    }

    async fn authorize(&self, config: &ConnectionConfig) -> Result<Arc<dyn SheetsClient>> {
        let token = config.option(ACCESS_TOKEN_OPTION).ok_or_else(|| {
            SheetError::invalid_configuration(format!(
                "{} authentication requires the '{}' option",
                self.method, ACCESS_TOKEN_OPTION
            ))
        })?;

        let client = SheetsApiClient::with_base_urls(
            token,
            config.option(SHEETS_API_URL_OPTION).unwrap_or(SHEETS_API_BASE),
            config.option(DRIVE_API_URL_OPTION).unwrap_or(DRIVE_API_BASE),
        )?;

        debug!("Authorized {} client", self.method);
        Ok(Arc::new(client))
    }
}

/// Register a token provider for every auth method
pub async fn register_token_providers(registry: &AuthRegistry) {
    for method in AuthMethod::ALL {
        registry
            .register_provider(Arc::new(TokenAuthProvider::new(method)))
            .await;
    }
}
