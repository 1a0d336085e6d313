use crate::error::{Result, SheetError};
use crate::traits::AuthProvider;
use crate::types::AuthMethod;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Registry of authentication providers, keyed by method
pub struct AuthRegistry {
    providers: Arc<RwLock<HashMap<AuthMethod, Arc<dyn AuthProvider>>>>,
}

impl AuthRegistry {
    pub fn new() -> Self {
        Self {
            providers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a provider for its auth method
    pub async fn register_provider(&self, provider: Arc<dyn AuthProvider>) {
        let method = provider.auth_method();
        let mut providers = self.providers.write().await;

        if providers.contains_key(&method) {
            warn!("Overwriting existing provider for auth method: {}", method);
        }

        providers.insert(method, provider);
        debug!("Registered provider for auth method: {}", method);
    }

    /// Provider for a method, or `UnsupportedAuthMethod` if none is registered
    pub async fn provider(&self, method: AuthMethod) -> Result<Arc<dyn AuthProvider>> {
        let providers = self.providers.read().await;

        providers.get(&method).cloned().ok_or_else(|| {
            SheetError::UnsupportedAuthMethod(format!(
                "No provider registered for auth method: {}",
                method
            ))
        })
    }

    /// Registered auth methods, in declaration order
    pub async fn list_methods(&self) -> Vec<AuthMethod> {
        let providers = self.providers.read().await;
        AuthMethod::ALL
            .into_iter()
            .filter(|m| providers.contains_key(m))
            .collect()
    }

    pub async fn has_method(&self, method: AuthMethod) -> bool {
        self.providers.read().await.contains_key(&method)
    }
}

impl Default for AuthRegistry {
    fn default() -> Self {
        Self::new()
    }
}
