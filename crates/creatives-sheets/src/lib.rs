//! Google Sheets row source for the creative aggregation pipeline.
//!
//! Wraps the `spreadsheets.values.get` REST endpoint: fetches the configured
//! range, treats the first grid row as column headers, and hands back
//! `Vec<RawRow>` for normalization. Failures are classified into
//! [`SheetsError`] (access denied, not found, invalid request, generic API
//! error) and propagated; retry policy belongs to the caller.

pub mod client;
pub mod error;
pub mod types;

pub use client::SheetsClient;
pub use error::SheetsError;
pub use types::ValueRange;
