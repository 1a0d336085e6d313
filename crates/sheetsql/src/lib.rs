//! # sheetsql
//!
//! Query spreadsheet worksheets with the table query language, addressing
//! columns by the labels in their header row.
//!
//! ## Architecture
//!
//! - **Connection**: authorized session; looks up spreadsheets by ID
//! - **Spreadsheet**: named group of worksheets; looks up worksheets by title
//! - **Worksheet**: a single grid; runs queries and returns [`Rows`]
//! - **ColumnMap**: rewrites header labels into positional identifiers
//! - **response**: extracts the embedded payload and materializes rows
//!
//! Collaborators are traits so they can be swapped out:
//!
//! - **Transport**: GET against the table query endpoint
//! - **SheetsClient**: header row reads, metadata listing, appends
//! - **AuthProvider**: turns configuration into an authorized client
//!
//! ## Example
//!
//! ```rust,no_run
//! use sheetsql::{AuthRegistry, Connection, ConnectionConfig, RowShape, Transport};
//! use std::sync::Arc;
//!
//! # async fn example(transport: Arc<dyn Transport>) -> sheetsql::Result<()> {
//! // Providers come from a backend crate such as `sheetsql-http`
//! let registry = AuthRegistry::new();
//!
//! let config = ConnectionConfig::new("service_account");
//! let conn = Connection::connect(&registry, config, transport).await?;
//!
//! let worksheet = conn
//!     .get_spreadsheet("1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms")
//!     .await?
//!     .get_worksheet("Class Data")
//!     .await?;
//!
//! for row in worksheet
//!     .query("SELECT Student Name, Major WHERE Gender = 'Female'", Some(RowShape::Mapping))
//!     .await?
//! {
//!     println!("{:?}", row);
//! }
//! # Ok(())
//! # }
//! ```

pub mod columns;
pub mod config;
pub mod connection;
pub mod error;
pub mod registry;
pub mod response;
pub mod spreadsheet;
pub mod traits;
pub mod types;
pub mod worksheet;

// Re-export commonly used items
pub use columns::{column_identifier, ColumnMap};
pub use config::{ConnectionConfig, TQ_BASE_URL};
pub use connection::Connection;
pub use error::{Result, SheetError};
pub use registry::AuthRegistry;
pub use response::{handle_response, parse_embedded_payload, Rows, TqCell, TqColumn, TqRow, TqTable};
pub use spreadsheet::Spreadsheet;
pub use traits::{AuthProvider, SheetsClient, Transport};
pub use types::{
    AuthMethod, MissPolicy, Row, RowShape, SpreadsheetFile, TransportResponse,
    WorksheetProperties,
};
pub use worksheet::Worksheet;
