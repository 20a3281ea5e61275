use thiserror::Error;

/// Errors returned by the Google Sheets client.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API key lacks access to the spreadsheet (HTTP 403).
    #[error("access denied for spreadsheet {spreadsheet_id}: {message}")]
    AccessDenied {
        spreadsheet_id: String,
        message: String,
    },

    /// The spreadsheet or range does not exist (HTTP 404).
    #[error("spreadsheet or range not found: {message}")]
    NotFound { message: String },

    /// The request was malformed, e.g. an unparseable range (HTTP 400).
    #[error("invalid Sheets request: {message}")]
    InvalidRequest { message: String },

    /// Any other non-2xx API response.
    #[error("Sheets API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
