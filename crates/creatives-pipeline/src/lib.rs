//! Creative aggregation pipeline.
//!
//! Turns a flat list of spreadsheet rows (one row per account/campaign/day
//! ad-set performance snapshot) into a deduplicated list of grouped
//! creatives, each carrying its full ad-set history and pre-reduced summary
//! metrics, sorted most-recently-updated first. A secondary index regroups
//! the output by (account, campaign, first-seen-day) for comparison views.
//!
//! The pipeline is synchronous and pure: each run operates on its own
//! freshly fetched row list and allocates fresh output. The only async
//! boundaries (the sheet fetch and the library-status source) live in the
//! `creatives-sheets` and `creatives-core` crates.

pub mod adsets;
pub mod group;
pub mod metrics;
pub mod normalize;
pub mod pipeline;

mod fields;

pub use adsets::build_ad_set_groups;
pub use group::{group_rows, GroupOutcome};
pub use metrics::aggregate_entries;
pub use normalize::normalize_row;
pub use pipeline::{apply_library_status, run, sort_creatives, PipelineResult};
