use thiserror::Error;

/// Unified error type for spreadsheet query operations
#[derive(Error, Debug)]
pub enum SheetError {
    /// Requested auth method is unknown or has no registered provider
    #[error("Unsupported authentication method: {0}")]
    UnsupportedAuthMethod(String),

    /// Response body did not contain a well-formed embedded payload
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The remote query engine rejected the rewritten query
    #[error("Response went through but received invalid query: {payload}")]
    InvalidQuery { payload: serde_json::Value },

    /// Row shape name outside mapping/sequence/tuple
    #[error("Invalid row shape: {0} (valid row shapes are mapping, sequence, tuple)")]
    InvalidRowShape(String),

    /// No spreadsheet with the given ID in this connection
    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    /// No worksheet with the given title in the spreadsheet
    #[error("Worksheet '{title}' not found in spreadsheet {spreadsheet_id}")]
    WorksheetNotFound {
        spreadsheet_id: String,
        title: String,
    },

    /// Row to insert does not match the worksheet width
    #[error("Worksheet has {expected} columns, but row number {row} contains {actual} values")]
    RowLengthMismatch {
        expected: usize,
        actual: usize,
        row: usize,
    },

    /// Network or protocol failure in the transport layer
    #[error("Transport error: {0}")]
    Transport(String),

    /// Failure reported by the spreadsheet client handle
    #[error("Client error: {0}")]
    Client(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SheetError {
    /// Create a "worksheet not found" error
    pub fn worksheet_not_found(spreadsheet_id: impl Into<String>, title: impl Into<String>) -> Self {
        SheetError::WorksheetNotFound {
            spreadsheet_id: spreadsheet_id.into(),
            title: title.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        SheetError::MalformedResponse(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        SheetError::InvalidConfiguration(msg.into())
    }

    /// True for lookup misses on spreadsheets or worksheets
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SheetError::SpreadsheetNotFound(_) | SheetError::WorksheetNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
