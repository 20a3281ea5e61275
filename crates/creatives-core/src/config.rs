use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` in the CLI before this runs; this function
/// itself only reads the process environment.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the actual environment so it
/// can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let spreadsheet_id = require("CREATIVES_SHEET_ID")?;
    let sheets_api_key = require("GOOGLE_SHEETS_API_KEY")?;

    let sheet_range = or_default("CREATIVES_SHEET_RANGE", "Sheet1");
    let log_level = or_default("CREATIVES_LOG_LEVEL", "info");
    let library_path = PathBuf::from(or_default("CREATIVES_LIBRARY_PATH", "./config/library.yaml"));
    let request_timeout_secs = parse_u64("CREATIVES_REQUEST_TIMEOUT_SECS", "30")?;

    Ok(AppConfig {
        spreadsheet_id,
        sheet_range,
        sheets_api_key,
        log_level,
        library_path,
        request_timeout_secs,
    })
}
