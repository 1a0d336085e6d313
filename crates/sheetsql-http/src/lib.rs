//! HTTP implementations of the sheetsql collaborator traits
//!
//! - [`ReqwestTransport`]: GET against the table query endpoint
//! - [`SheetsApiClient`]: Sheets v4 and Drive v3 REST calls
//! - [`TokenAuthProvider`]: builds a client from a pre-issued access token
//!
//! ## Example
//!
//! ```rust,no_run
//! use sheetsql::{AuthRegistry, Connection, ConnectionConfig};
//! use sheetsql_http::{register_token_providers, ReqwestTransport, TransportOptions};
//! use std::sync::Arc;
//!
//! # async fn example() -> sheetsql::Result<()> {
//! let registry = AuthRegistry::new();
//! register_token_providers(&registry).await;
//!
//! let token = "ya29.a0Af...";
//! let transport = ReqwestTransport::new(TransportOptions::default().with_bearer_token(token))?;
//! let config = ConnectionConfig::new("oauth").with_option("access_token", token);
//!
//! let conn = Connection::connect(&registry, config, Arc::new(transport)).await?;
//! println!("{} spreadsheets", conn.len().await);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod transport;

pub use auth::{register_token_providers, TokenAuthProvider, ACCESS_TOKEN_OPTION};
pub use client::SheetsApiClient;
pub use transport::{ReqwestTransport, TransportOptions};
