//! Library manifest: which creatives already exist in the asset library.
//!
//! The web app persists saved/draft creatives elsewhere; this crate only
//! consumes a snapshot of that collection as a YAML manifest and answers
//! status lookups during the post-grouping join.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::LibraryStatus;
use crate::ConfigError;

/// Resolves the library status of a creative.
///
/// Lookup precedence is image asset id, then full image URL, then the URL's
/// trailing filename. Returns `None` for creatives not in the library.
pub trait LibraryStatusLookup {
    fn lookup(&self, image_asset_id: &str, image_url: &str) -> Option<LibraryStatus>;
}

/// One manifest entry. At least one identifier must be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryEntry {
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    pub status: LibraryStatus,
}

#[derive(Debug, Deserialize)]
struct LibraryFile {
    creatives: Vec<LibraryEntry>,
}

/// In-memory index over the library manifest.
#[derive(Debug, Default)]
pub struct LibraryManifest {
    by_asset_id: HashMap<String, LibraryStatus>,
    by_image_url: HashMap<String, LibraryStatus>,
    by_filename: HashMap<String, LibraryStatus>,
}

impl LibraryManifest {
    /// An empty manifest; every lookup returns `None`.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and validate the library manifest from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails
    /// validation (entry with no identifier, or duplicate asset id).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LibraryFileIo {
            path: path.display().to_string(),
            source: e,
        })?;

        let file: LibraryFile = serde_yaml::from_str(&content)?;
        Self::from_entries(&file.creatives)
    }

    /// Build a manifest index from in-memory entries.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if an entry carries no identifier or
    /// an asset id appears twice.
    pub fn from_entries(entries: &[LibraryEntry]) -> Result<Self, ConfigError> {
        let mut manifest = Self::default();
        let mut seen_ids = HashSet::new();

        for entry in entries {
            let has_id = entry.asset_id.as_deref().is_some_and(|s| !s.is_empty());
            let has_url = entry.image_url.as_deref().is_some_and(|s| !s.is_empty());
            let has_file = entry.filename.as_deref().is_some_and(|s| !s.is_empty());
            if !(has_id || has_url || has_file) {
                return Err(ConfigError::Validation(
                    "library entry must carry an asset_id, image_url, or filename".to_string(),
                ));
            }

            if let Some(id) = entry.asset_id.as_deref().filter(|s| !s.is_empty()) {
                if !seen_ids.insert(id.to_string()) {
                    return Err(ConfigError::Validation(format!(
                        "duplicate asset_id in library manifest: '{id}'"
                    )));
                }
                manifest.by_asset_id.insert(id.to_string(), entry.status);
            }
            if let Some(url) = entry.image_url.as_deref().filter(|s| !s.is_empty()) {
                manifest.by_image_url.insert(url.to_string(), entry.status);
            }
            if let Some(name) = entry.filename.as_deref().filter(|s| !s.is_empty()) {
                manifest.by_filename.insert(name.to_string(), entry.status);
            }
        }

        Ok(manifest)
    }

    /// Number of distinct asset ids indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_asset_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_asset_id.is_empty()
            && self.by_image_url.is_empty()
            && self.by_filename.is_empty()
    }
}

impl LibraryStatusLookup for LibraryManifest {
    fn lookup(&self, image_asset_id: &str, image_url: &str) -> Option<LibraryStatus> {
        if !image_asset_id.is_empty() {
            if let Some(status) = self.by_asset_id.get(image_asset_id) {
                return Some(*status);
            }
        }
        if !image_url.is_empty() {
            if let Some(status) = self.by_image_url.get(image_url) {
                return Some(*status);
            }
            // Fall back to the trailing path segment, which is how the web
            // app names uploaded files.
            let filename = image_url
                .rsplit('/')
                .next()
                .map(|tail| tail.split('?').next().unwrap_or(tail));
            if let Some(name) = filename.filter(|s| !s.is_empty()) {
                if let Some(status) = self.by_filename.get(name) {
                    return Some(*status);
                }
            }
        }
        None
    }
}
