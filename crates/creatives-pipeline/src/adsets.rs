//! Secondary grouping of creatives into ad sets for comparison views.
//!
//! An "ad set" here is re-derived as (account, campaign, first-seen-day)
//! rather than taken from the ad platform's own ad-set id: creatives that
//! launched together under the same account and campaign belong together,
//! whatever ids the platform assigned them. The index is rebuilt fully from
//! the current creative list on every call and carries no state across runs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use chrono_tz::America::Chicago;

use creatives_core::{
    AdSetGroup, CreativeSummary, DeliveryCounts, DeliveryStatus, GroupedCreative, WorkflowCounts,
    WorkflowStatus,
};

use crate::normalize::primary_segment;

/// Builds the ad-set grouping index over a creative list.
///
/// Each creative lands in the group keyed by its lowercased primary account
/// and campaign segments plus its first-seen day rendered in sheet-local
/// time. Delivery status (from the campaign status string) and workflow
/// status (from the library join) are counted as two independent axes, and
/// the group's `last_updated` max is refreshed on every member insertion.
///
/// Creatives with no parseable first-seen date cannot be keyed and are left
/// out of the index.
#[must_use]
pub fn build_ad_set_groups(creatives: &[GroupedCreative]) -> Vec<AdSetGroup> {
    let mut groups: Vec<AdSetGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for creative in creatives {
        let Some(first_seen) = creative.first_seen else {
            tracing::debug!(
                image_asset_id = %creative.image_asset_id,
                "creative has no first-seen date; omitting from ad-set index"
            );
            continue;
        };

        let primary_account = primary_segment(&creative.account_name).to_lowercase();
        let primary_campaign = primary_segment(&creative.campaign_name).to_lowercase();
        let first_seen_day = sheet_local_day(first_seen);
        let key = format!("{primary_account}___{primary_campaign}___{first_seen_day}");

        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                groups.push(AdSetGroup {
                    key: key.clone(),
                    primary_account,
                    primary_campaign,
                    first_seen_day,
                    delivery: DeliveryCounts::default(),
                    workflow: WorkflowCounts::default(),
                    creatives: Vec::new(),
                    last_updated: None,
                });
                let slot = groups.len() - 1;
                index.insert(key, slot);
                slot
            }
        };

        insert_member(&mut groups[slot], creative);
    }

    groups
}

/// Adds one creative to a group: counters, member summary, and the running
/// `last_updated` max.
fn insert_member(group: &mut AdSetGroup, creative: &GroupedCreative) {
    let delivery = DeliveryStatus::from_campaign_status(&creative.campaign_status);
    match delivery {
        DeliveryStatus::Active => group.delivery.active += 1,
        DeliveryStatus::Paused => group.delivery.paused += 1,
        DeliveryStatus::Inactive => group.delivery.inactive += 1,
        DeliveryStatus::Unknown => group.delivery.unknown += 1,
    }

    let workflow = WorkflowStatus::from(creative.library_status);
    match workflow {
        WorkflowStatus::Draft => group.workflow.draft += 1,
        WorkflowStatus::Saved => group.workflow.saved += 1,
        WorkflowStatus::None => group.workflow.none += 1,
    }

    group.last_updated = match (group.last_updated, creative.last_updated) {
        (Some(current), Some(candidate)) => Some(current.max(candidate)),
        (current, candidate) => current.or(candidate),
    };

    group.creatives.push(CreativeSummary {
        image_asset_id: creative.image_asset_id.clone(),
        image_asset_name: creative.image_asset_name.clone(),
        total_cost: creative.aggregated.total_cost,
        avg_cost_per_lead: creative.aggregated.avg_cost_per_lead,
        last_updated: creative.last_updated,
        delivery_status: delivery,
        workflow_status: workflow,
    });
}

/// Renders a UTC instant as a `yyyy-MM-dd` day in sheet-local time.
fn sheet_local_day(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&Chicago).format("%Y-%m-%d").to_string()
}
