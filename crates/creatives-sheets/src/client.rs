//! HTTP client for the Google Sheets `values.get` REST endpoint.
//!
//! Wraps `reqwest` with API key management, typed response deserialization,
//! and status-code classification into [`SheetsError`]. The client performs
//! no retries: an upstream failure aborts the pipeline run and surfaces to
//! the operator.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use creatives_core::RawRow;

use crate::error::SheetsError;
use crate::types::ValueRange;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/";

/// Client for the Google Sheets REST API (API-key auth, read-only).
///
/// Use [`SheetsClient::new`] for production or
/// [`SheetsClient::with_base_url`] to point at a mock server in tests.
pub struct SheetsClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl SheetsClient {
    /// Creates a new client pointed at the production Sheets API.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, SheetsError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SheetsError::InvalidRequest`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("creatives/0.1 (performance-sync)")
            .build()?;

        // Normalise: exactly one trailing slash so path segments append to
        // the root rather than replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SheetsError::InvalidRequest {
            message: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Fetches the configured range and converts the grid into header-keyed
    /// rows (first grid row = headers).
    ///
    /// Requests `valueRenderOption=FORMATTED_VALUE`, matching what the sheet
    /// operators see; the pipeline's tolerant numeric parsing handles the
    /// currency formatting this produces.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::AccessDenied`] on HTTP 403.
    /// - [`SheetsError::NotFound`] on HTTP 404 (bad spreadsheet id or sheet).
    /// - [`SheetsError::InvalidRequest`] on HTTP 400 (unparseable range).
    /// - [`SheetsError::Api`] on any other non-2xx status.
    /// - [`SheetsError::Http`] on network failure.
    /// - [`SheetsError::Deserialize`] if the body is not a value range.
    pub async fn fetch_rows(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<RawRow>, SheetsError> {
        let value_range = self.get_values(spreadsheet_id, range).await?;
        let rows = value_range.into_rows();
        tracing::debug!(
            spreadsheet_id,
            range,
            row_count = rows.len(),
            "fetched sheet rows"
        );
        Ok(rows)
    }

    /// Fetches the raw [`ValueRange`] for a spreadsheet range.
    ///
    /// # Errors
    ///
    /// Same classification as [`SheetsClient::fetch_rows`].
    pub async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<ValueRange, SheetsError> {
        let url = self.build_url(spreadsheet_id, range)?;
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, spreadsheet_id, &body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize {
            context: format!("values.get({spreadsheet_id}, {range})"),
            source: e,
        })
    }

    /// Builds `{base}/v4/spreadsheets/{id}/values/{range}` with the API key
    /// and render options as query parameters. The range lands in a single
    /// path segment, so a `/` in a sheet name cannot break the path.
    fn build_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url, SheetsError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SheetsError::InvalidRequest {
                message: format!("base URL '{}' cannot carry a path", self.base_url),
            })?
            .extend(["v4", "spreadsheets", spreadsheet_id, "values", range]);
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("valueRenderOption", "FORMATTED_VALUE")
            .append_pair("dateTimeRenderOption", "FORMATTED_STRING");
        Ok(url)
    }
}

/// Maps a non-2xx response to a classified [`SheetsError`].
fn classify_failure(status: StatusCode, spreadsheet_id: &str, body: &str) -> SheetsError {
    let message = api_error_message(body);
    match status {
        StatusCode::FORBIDDEN => SheetsError::AccessDenied {
            spreadsheet_id: spreadsheet_id.to_string(),
            message,
        },
        StatusCode::NOT_FOUND => SheetsError::NotFound { message },
        StatusCode::BAD_REQUEST => SheetsError::InvalidRequest { message },
        other => SheetsError::Api {
            status: other.as_u16(),
            message,
        },
    }
}

/// Pulls `error.message` out of a Google API error body, falling back to the
/// raw body (or a placeholder) when the body is not the documented shape.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "no error body".to_string()
            } else {
                body.trim().to_string()
            }
        })
}
