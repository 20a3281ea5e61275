//! Response types for the Sheets `values.get` endpoint.
//!
//! The API returns the requested range as a row-major grid of JSON values.
//! With `valueRenderOption=UNFORMATTED_VALUE` cells arrive as native numbers
//! where the sheet holds numbers, so grid cells are kept as `serde_json::Value`
//! and coerced during normalization, not here.

use serde::Deserialize;
use serde_json::Value;

use creatives_core::RawRow;

/// Top-level response from `GET /v4/spreadsheets/{id}/values/{range}`.
#[derive(Debug, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(rename = "majorDimension", default)]
    pub major_dimension: Option<String>,
    /// Row-major cell grid. Absent entirely when the range is empty.
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    /// Converts the grid into header-keyed rows.
    ///
    /// The first grid row is the header row. Data rows shorter than the
    /// header are padded with empty strings (the API truncates trailing
    /// empty cells); cells beyond the header width are dropped. An empty or
    /// header-only grid yields no rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<RawRow> {
        let mut grid = self.values.into_iter();
        let Some(header_cells) = grid.next() else {
            return Vec::new();
        };

        let headers: Vec<String> = header_cells.iter().map(header_text).collect();

        grid.map(|cells| {
            let mut row = RawRow::with_capacity(headers.len());
            for (i, header) in headers.iter().enumerate() {
                if header.is_empty() {
                    continue;
                }
                let cell = cells.get(i).cloned().unwrap_or(Value::String(String::new()));
                row.insert(header.clone(), cell);
            }
            row
        })
        .collect()
    }
}

fn header_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
