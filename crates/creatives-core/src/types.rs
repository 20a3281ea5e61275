//! Domain model for the creative aggregation pipeline.
//!
//! `RawRow` is the wire shape coming off the spreadsheet fetch: one map per
//! sheet row, keyed by the exact column header text. Everything downstream of
//! normalization works with the typed shapes in this module.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw spreadsheet row, keyed by column header.
///
/// Values are `serde_json::Value` because the sheet fetch may return either
/// formatted strings (`"$1,234.56"`) or native numbers, depending on the
/// render option requested upstream. Header spellings are inconsistent across
/// data sources; resolution happens during normalization, not here.
pub type RawRow = HashMap<String, serde_json::Value>;

/// One normalized ad-set performance snapshot (one sheet row).
///
/// Immutable after normalization and owned by exactly one [`GroupedCreative`].
/// Numeric fields are parse-or-zero: malformed input never fails, it just
/// lands as `0.0`. `date` is `None` when the sheet date could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdSetEntry {
    pub ad_set_id: String,
    pub ad_id: String,
    pub ad_creative_id: String,
    pub account_name: String,
    pub campaign_name: String,
    pub campaign_status: String,
    pub cost: f64,
    pub cost_per_lead: f64,
    pub cost_per_click: f64,
    pub leads: f64,
    pub clicks: f64,
    /// Sheet-local (Central Time) date converted to UTC.
    pub date: Option<DateTime<Utc>>,
}

/// Summary statistics reduced from one group's entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedMetrics {
    pub total_cost: f64,
    /// Mean of the strictly-positive observed cost-per-lead values, not a
    /// spend-weighted average. `0.0` when no entry has a positive CPL.
    pub avg_cost_per_lead: f64,
    /// Same policy as `avg_cost_per_lead`, over cost-per-click.
    pub avg_cpc: f64,
    /// Total historical rows in the group (not deduplicated).
    pub total_ad_sets: usize,
    /// Distinct non-empty `ad_set_id` values among the group's entries.
    pub unique_ad_sets: usize,
    pub total_leads: f64,
    pub total_clicks: f64,
}

/// Campaign type derived from keywords in the campaign name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignType {
    Lookalike,
    Retargeting,
    Broad,
    Standard,
}

impl CampaignType {
    /// Derives the campaign type from a campaign name via a case-insensitive
    /// keyword scan. Unrecognized names are `Standard`.
    #[must_use]
    pub fn from_campaign_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("lookalike") {
            CampaignType::Lookalike
        } else if lower.contains("retarget") {
            CampaignType::Retargeting
        } else if lower.contains("broad") {
            CampaignType::Broad
        } else {
            CampaignType::Standard
        }
    }
}

/// Ad-platform delivery status, parsed from the campaign status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Active,
    Paused,
    Inactive,
    Unknown,
}

impl DeliveryStatus {
    /// Case-insensitive exact match on the status string; anything that is
    /// not active/paused/inactive maps to `Unknown`.
    #[must_use]
    pub fn from_campaign_status(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "active" => DeliveryStatus::Active,
            "paused" => DeliveryStatus::Paused,
            "inactive" => DeliveryStatus::Inactive,
            _ => DeliveryStatus::Unknown,
        }
    }
}

/// Workflow status of a creative in the asset library.
///
/// Independent of [`DeliveryStatus`]: a creative can be paused on the ad
/// platform and still be saved in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Draft,
    Saved,
    None,
}

/// Library persistence status supplied by the external lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryStatus {
    Draft,
    Saved,
}

impl From<Option<LibraryStatus>> for WorkflowStatus {
    fn from(status: Option<LibraryStatus>) -> Self {
        match status {
            Some(LibraryStatus::Draft) => WorkflowStatus::Draft,
            Some(LibraryStatus::Saved) => WorkflowStatus::Saved,
            None => WorkflowStatus::None,
        }
    }
}

/// The aggregate unit of the pipeline: one creative (image asset) with its
/// full ad-set history and pre-reduced summary metrics.
///
/// `image_asset_id` is the sole grouping key and is non-empty and unique
/// within one pipeline run. Descriptive fields come from the group's
/// first-seen row; `ad_sets` preserves row-encounter order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedCreative {
    pub image_asset_id: String,
    pub image_asset_name: String,
    pub image_url: String,
    /// Segment of the campaign name before the first `" | "` separator.
    pub litigation_name: String,
    pub campaign_type: CampaignType,
    pub account_name: String,
    pub campaign_name: String,
    pub campaign_status: String,
    pub ad_sets: Vec<AdSetEntry>,
    pub aggregated: AggregatedMetrics,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
    pub saved_in_library: bool,
    pub library_status: Option<LibraryStatus>,
}

/// Per-creative roll-up carried inside an [`AdSetGroup`] member list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeSummary {
    pub image_asset_id: String,
    pub image_asset_name: String,
    pub total_cost: f64,
    pub avg_cost_per_lead: f64,
    pub last_updated: Option<DateTime<Utc>>,
    pub delivery_status: DeliveryStatus,
    pub workflow_status: WorkflowStatus,
}

/// Delivery-status counts for one ad-set group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryCounts {
    pub active: usize,
    pub paused: usize,
    pub inactive: usize,
    pub unknown: usize,
}

/// Workflow-status counts for one ad-set group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkflowCounts {
    pub draft: usize,
    pub saved: usize,
    pub none: usize,
}

/// Secondary grouping of creatives for cross-creative comparison views.
///
/// Keyed by `account___campaign___first-seen-day` (lowercased primary
/// segments, sheet-local day). Rebuilt fully from the current creative list
/// on every invocation; carries no identity across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdSetGroup {
    pub key: String,
    pub primary_account: String,
    pub primary_campaign: String,
    /// First-seen day in sheet-local time, formatted `yyyy-MM-dd`.
    pub first_seen_day: String,
    pub delivery: DeliveryCounts,
    pub workflow: WorkflowCounts,
    pub creatives: Vec<CreativeSummary>,
    /// Max `last_updated` across members, maintained on every insertion.
    pub last_updated: Option<DateTime<Utc>>,
}
