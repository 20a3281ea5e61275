//! Row normalization: raw string-keyed sheet rows into typed ad-set entries.
//!
//! Never fails. Worst case a malformed row normalizes to zero-valued metrics
//! and empty-string identifiers; whether the row is worth keeping is decided
//! later by the grouping engine, based solely on the image asset id.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::America::Chicago;
use chrono_tz::Tz;

use creatives_core::{AdSetEntry, RawRow};

use crate::fields::{field_metric, field_text};

/// The spreadsheet records dates in Central Time without an offset. Parsing
/// them as UTC would shift day boundaries for every evening row.
const SHEET_TZ: Tz = Chicago;

// Header variants observed across the upstream data sources, in priority
// order. The ad-set id is the worst offender.
pub(crate) const IMAGE_ASSET_ID: &[&str] = &[
    "Image Asset ID",
    "Image asset ID",
    "Image Asset Id",
    "imageAssetId",
];
pub(crate) const IMAGE_ASSET_NAME: &[&str] =
    &["Image Asset Name", "Image asset name", "imageAssetName"];
pub(crate) const IMAGE_URL: &[&str] = &["Image URL", "Image Url", "imageUrl"];
const AD_SET_ID: &[&str] = &["Ad Set ID", "AdSet ID", "Ad set ID", "adSetId", "Adset ID"];
const AD_ID: &[&str] = &["Ad ID", "Ad Id", "adId"];
const AD_CREATIVE_ID: &[&str] = &["Ad Creative ID", "Ad Creative Id", "adCreativeId"];
const ACCOUNT_NAME: &[&str] = &["Account Name", "Account name", "accountName"];
const CAMPAIGN_NAME: &[&str] = &["Campaign Name", "Campaign name", "campaignName"];
const CAMPAIGN_STATUS: &[&str] = &["Campaign Status", "Campaign status", "campaignStatus"];
const COST: &[&str] = &["Cost", "cost", "Amount Spent"];
const COST_PER_LEAD: &[&str] = &[
    "Cost Per Website Lead",
    "Cost per Website Lead",
    "costPerWebsiteLead",
    "Cost Per Lead",
];
const COST_PER_CLICK: &[&str] = &[
    "Cost Per Link Click",
    "Cost per Link Click",
    "costPerLinkClick",
    "Cost Per Click",
];
const LEADS: &[&str] = &["Website Leads", "websiteLeads", "Leads"];
const CLICKS: &[&str] = &["Link Clicks", "linkClicks", "Clicks"];
const DATE: &[&str] = &["Date", "Day", "date"];

/// Converts a raw sheet row into a typed [`AdSetEntry`].
///
/// Pure and infallible: tolerant numeric parsing coerces malformed cells to
/// zero, identifier lookups fall back through known header variants, and the
/// sheet-local date converts Central → UTC. An unparseable date lands as
/// `None`.
#[must_use]
pub fn normalize_row(row: &RawRow) -> AdSetEntry {
    AdSetEntry {
        ad_set_id: field_text(row, AD_SET_ID),
        ad_id: field_text(row, AD_ID),
        ad_creative_id: field_text(row, AD_CREATIVE_ID),
        account_name: field_text(row, ACCOUNT_NAME),
        campaign_name: field_text(row, CAMPAIGN_NAME),
        campaign_status: field_text(row, CAMPAIGN_STATUS),
        cost: field_metric(row, COST),
        cost_per_lead: field_metric(row, COST_PER_LEAD),
        cost_per_click: field_metric(row, COST_PER_CLICK),
        leads: field_metric(row, LEADS),
        clicks: field_metric(row, CLICKS),
        date: parse_sheet_date(&field_text(row, DATE)),
    }
}

/// Resolves the grouping key for a row. Empty means the row carries no
/// creative identity and will be dropped by the grouping engine.
#[must_use]
pub fn image_asset_id(row: &RawRow) -> String {
    field_text(row, IMAGE_ASSET_ID)
}

/// Parses a sheet-local date string and converts it to a UTC instant.
///
/// Accepts `MM/DD/YYYY` and `YYYY-MM-DD`, each with an optional
/// `HH:MM[:SS]` time (date-only strings mean local midnight). The local
/// time is interpreted in Central Time: a fall-back ambiguity resolves to
/// the earlier offset, and a spring-forward gap rolls forward one hour.
#[must_use]
pub fn parse_sheet_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let naive = parse_naive(text)?;
    match SHEET_TZ.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => {
            Some(dt.with_timezone(&Utc))
        }
        chrono::LocalResult::None => {
            // Local time inside the spring-forward gap; the wall clock
            // skipped it, so the next representable instant is an hour on.
            let shifted = naive + chrono::Duration::hours(1);
            SHEET_TZ
                .from_local_datetime(&shifted)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        }
    }
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];
    const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%m/%d/%y"];

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// The segment of a compound name before the first `" | "` separator, used
/// for the derived litigation name and the ad-set grouping key.
#[must_use]
pub fn primary_segment(name: &str) -> &str {
    name.split(" | ").next().unwrap_or(name).trim()
}
