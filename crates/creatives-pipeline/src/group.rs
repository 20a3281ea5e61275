//! Grouping engine: keyed accumulation of normalized rows by image asset id.

use std::collections::HashMap;

use creatives_core::{AggregatedMetrics, CampaignType, GroupedCreative, RawRow};

use crate::fields::field_text;
use crate::metrics::{aggregate_entries, date_bounds};
use crate::normalize::{
    image_asset_id, normalize_row, primary_segment, IMAGE_ASSET_NAME, IMAGE_URL,
};

/// Result of one grouping pass: creatives in first-encounter order plus the
/// count of rows dropped for lacking a business key.
#[derive(Debug)]
pub struct GroupOutcome {
    pub creatives: Vec<GroupedCreative>,
    pub skipped_rows: usize,
}

/// Groups raw rows by image asset id, accumulating each group's full entry
/// history and reducing its summary metrics.
///
/// The image asset id is the sole business key for a creative: rows whose
/// resolved id is empty or whitespace are dropped entirely (counted, never
/// grouped under a synthetic key). The first retained row of each key
/// supplies the group's descriptive fields; entries preserve row-encounter
/// order and groups preserve first-encounter order, so the same input
/// always produces the same output.
#[must_use]
pub fn group_rows(rows: &[RawRow]) -> GroupOutcome {
    let mut creatives: Vec<GroupedCreative> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut skipped_rows = 0usize;

    for row in rows {
        let asset_id = image_asset_id(row);
        if asset_id.is_empty() {
            skipped_rows += 1;
            continue;
        }

        let entry = normalize_row(row);
        let slot = match index.get(&asset_id) {
            Some(&slot) => slot,
            None => {
                creatives.push(GroupedCreative {
                    image_asset_id: asset_id.clone(),
                    image_asset_name: field_text(row, IMAGE_ASSET_NAME),
                    image_url: field_text(row, IMAGE_URL),
                    litigation_name: primary_segment(&entry.campaign_name).to_string(),
                    campaign_type: CampaignType::from_campaign_name(&entry.campaign_name),
                    account_name: entry.account_name.clone(),
                    campaign_name: entry.campaign_name.clone(),
                    campaign_status: entry.campaign_status.clone(),
                    ad_sets: Vec::new(),
                    aggregated: AggregatedMetrics::default(),
                    first_seen: None,
                    last_updated: None,
                    saved_in_library: false,
                    library_status: None,
                });
                let slot = creatives.len() - 1;
                index.insert(asset_id, slot);
                slot
            }
        };

        creatives[slot].ad_sets.push(entry);
    }

    for creative in &mut creatives {
        creative.aggregated = aggregate_entries(&creative.ad_sets);
        let (first_seen, last_updated) = date_bounds(&creative.ad_sets);
        creative.first_seen = first_seen;
        creative.last_updated = last_updated;
    }

    tracing::debug!(
        input_rows = rows.len(),
        groups = creatives.len(),
        skipped_rows,
        "grouped sheet rows by image asset id"
    );

    GroupOutcome {
        creatives,
        skipped_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(asset_id: &str, cost: &str, date: &str) -> RawRow {
        let mut r = RawRow::new();
        r.insert("Image Asset ID".to_string(), json!(asset_id));
        r.insert("Image Asset Name".to_string(), json!("creative.png"));
        r.insert("Image URL".to_string(), json!("https://cdn.x/creative.png"));
        r.insert(
            "Campaign Name".to_string(),
            json!("Camp Lejeune | Lookalike 2%"),
        );
        r.insert("Account Name".to_string(), json!("Acme Legal"));
        r.insert("Campaign Status".to_string(), json!("Active"));
        r.insert("Cost".to_string(), json!(cost));
        r.insert("Date".to_string(), json!(date));
        r
    }

    #[test]
    fn rows_without_asset_id_are_dropped_and_counted() {
        let rows = vec![
            row("asset-1", "$10", "01/01/2024"),
            row("", "$5", "01/01/2024"),
            row("   ", "$7", "01/02/2024"),
        ];
        let outcome = group_rows(&rows);
        assert_eq!(outcome.creatives.len(), 1);
        assert_eq!(outcome.skipped_rows, 2);
        // Conservation: retained rows all land in a group.
        let total: usize = outcome
            .creatives
            .iter()
            .map(|c| c.aggregated.total_ad_sets)
            .sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn first_row_initializes_descriptive_fields() {
        let mut second = row("asset-1", "$5", "01/02/2024");
        second.insert("Campaign Status".to_string(), json!("Paused"));
        let rows = vec![row("asset-1", "$10", "01/01/2024"), second];
        let outcome = group_rows(&rows);
        let creative = &outcome.creatives[0];
        // Status comes from the first-seen row, not the latest.
        assert_eq!(creative.campaign_status, "Active");
        assert_eq!(creative.litigation_name, "Camp Lejeune");
        assert_eq!(creative.campaign_type, CampaignType::Lookalike);
        assert_eq!(creative.ad_sets.len(), 2);
    }

    #[test]
    fn groups_preserve_first_encounter_order() {
        let rows = vec![
            row("asset-b", "$1", "01/01/2024"),
            row("asset-a", "$1", "01/01/2024"),
            row("asset-b", "$1", "01/02/2024"),
        ];
        let outcome = group_rows(&rows);
        let ids: Vec<&str> = outcome
            .creatives
            .iter()
            .map(|c| c.image_asset_id.as_str())
            .collect();
        assert_eq!(ids, vec!["asset-b", "asset-a"]);
    }

    #[test]
    fn entries_preserve_row_encounter_order() {
        let rows = vec![
            row("asset-1", "$3", "01/03/2024"),
            row("asset-1", "$1", "01/01/2024"),
            row("asset-1", "$2", "01/02/2024"),
        ];
        let outcome = group_rows(&rows);
        let costs: Vec<f64> = outcome.creatives[0].ad_sets.iter().map(|e| e.cost).collect();
        assert_eq!(costs, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn date_bounds_are_reduced_per_group() {
        let rows = vec![
            row("asset-1", "$1", "01/05/2024"),
            row("asset-1", "$1", "01/02/2024"),
        ];
        let outcome = group_rows(&rows);
        let creative = &outcome.creatives[0];
        assert!(creative.first_seen.unwrap() < creative.last_updated.unwrap());
        assert_eq!(
            creative.aggregated.total_ad_sets,
            creative.ad_sets.len()
        );
    }

    #[test]
    fn empty_input_yields_empty_outcome() {
        let outcome = group_rows(&[]);
        assert!(outcome.creatives.is_empty());
        assert_eq!(outcome.skipped_rows, 0);
    }

    #[test]
    fn asset_ids_are_unique_in_output() {
        let rows = vec![
            row("asset-1", "$1", "01/01/2024"),
            row("asset-2", "$1", "01/01/2024"),
            row("asset-1", "$1", "01/02/2024"),
        ];
        let outcome = group_rows(&rows);
        let mut ids: Vec<&str> = outcome
            .creatives
            .iter()
            .map(|c| c.image_asset_id.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), outcome.creatives.len());
    }
}
