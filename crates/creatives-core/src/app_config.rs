use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub spreadsheet_id: String,
    pub sheet_range: String,
    pub sheets_api_key: String,
    pub log_level: String,
    pub library_path: PathBuf,
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("sheet_range", &self.sheet_range)
            .field("sheets_api_key", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("library_path", &self.library_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
