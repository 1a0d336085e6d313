use crate::error::Result;
use crate::types::{AuthMethod, MissPolicy, RowShape};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Base URL of the table query endpoint
pub const TQ_BASE_URL: &str = "https://spreadsheets.google.com/tq";

/// Connection configuration shared by a connection and everything it opens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Authentication method name (oauth, service_account)
    pub auth_method: String,
    /// Table query endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Behaviour of spreadsheet/worksheet lookups that miss
    #[serde(default)]
    pub on_miss: MissPolicy,
    /// Initial default row shape of every opened worksheet
    #[serde(default)]
    pub default_row_shape: RowShape,
    /// Provider-specific options (access token, credential paths, ...)
    #[serde(default)]
    pub options: HashMap<String, String>,
}

fn default_endpoint() -> String {
    TQ_BASE_URL.to_string()
}

impl ConnectionConfig {
    pub fn new(auth_method: impl Into<String>) -> Self {
        Self {
            auth_method: auth_method.into(),
            endpoint: default_endpoint(),
            on_miss: MissPolicy::default(),
            default_row_shape: RowShape::default(),
            options: HashMap::new(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_on_miss(mut self, on_miss: MissPolicy) -> Self {
        self.on_miss = on_miss;
        self
    }

    pub fn with_default_row_shape(mut self, shape: RowShape) -> Self {
        self.default_row_shape = shape;
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Parse the configured auth method
    pub fn auth_method(&self) -> Result<AuthMethod> {
        self.auth_method.parse()
    }

    /// Get connection string for display purposes (option values omitted)
    pub fn connection_string(&self) -> String {
        let mut keys: Vec<&str> = self.options.keys().map(String::as_str).collect();
        keys.sort_unstable();

        let mut conn = format!("{}+{}?on_miss={}", self.auth_method, self.endpoint, self.on_miss);
        if !keys.is_empty() {
            conn.push_str(&format!("&options={}", keys.join(",")));
        }
        conn
    }
}
