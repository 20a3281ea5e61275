//! Shared domain types and configuration for the creatives workspace.
//!
//! Defines the raw and normalized row shapes flowing through the aggregation
//! pipeline, the grouped-creative output model, the library manifest used to
//! join workflow status onto creatives, and env-driven application config.

use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod library;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use library::{LibraryEntry, LibraryManifest, LibraryStatusLookup};
pub use types::{
    AdSetEntry, AdSetGroup, AggregatedMetrics, CampaignType, CreativeSummary, DeliveryCounts,
    DeliveryStatus, GroupedCreative, LibraryStatus, RawRow, WorkflowCounts, WorkflowStatus,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read library manifest at {path}: {source}")]
    LibraryFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse library manifest: {0}")]
    LibraryFileParse(#[from] serde_yaml::Error),

    #[error("library manifest validation failed: {0}")]
    Validation(String),
}
