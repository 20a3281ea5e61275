//! Per-group metric reduction.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use creatives_core::{AdSetEntry, AggregatedMetrics};

/// Reduces a group's entries into summary statistics.
///
/// Totals (`total_cost`, `total_leads`, `total_clicks`) sum every entry,
/// zeros included. The CPL/CPC averages are the mean of the strictly
/// positive observed values only: a day with no leads reports a
/// cost-per-lead of zero, and folding those zeros in would drag the rate
/// toward nothing. `0.0` when no entry has a positive rate.
///
/// `total_ad_sets` is the historical row count; `unique_ad_sets` counts
/// distinct non-empty ad-set ids. Both are exposed because the views use
/// both.
#[must_use]
pub fn aggregate_entries(entries: &[AdSetEntry]) -> AggregatedMetrics {
    let mut metrics = AggregatedMetrics {
        total_ad_sets: entries.len(),
        ..AggregatedMetrics::default()
    };

    let mut seen_ad_sets: HashSet<&str> = HashSet::new();
    for entry in entries {
        metrics.total_cost += entry.cost;
        metrics.total_leads += entry.leads;
        metrics.total_clicks += entry.clicks;
        if !entry.ad_set_id.is_empty() {
            seen_ad_sets.insert(entry.ad_set_id.as_str());
        }
    }
    metrics.unique_ad_sets = seen_ad_sets.len();

    metrics.avg_cost_per_lead = positive_mean(entries.iter().map(|e| e.cost_per_lead));
    metrics.avg_cpc = positive_mean(entries.iter().map(|e| e.cost_per_click));

    metrics
}

/// Min and max entry dates for a group. `(None, None)` only when no entry
/// carries a parseable date.
#[must_use]
pub fn date_bounds(entries: &[AdSetEntry]) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let mut first_seen = None;
    let mut last_updated = None;
    for date in entries.iter().filter_map(|e| e.date) {
        first_seen = Some(first_seen.map_or(date, |f: DateTime<Utc>| f.min(date)));
        last_updated = Some(last_updated.map_or(date, |l: DateTime<Utc>| l.max(date)));
    }
    (first_seen, last_updated)
}

/// Mean of the strictly-positive values in the iterator, or `0.0` if none.
fn positive_mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count: u32 = 0;
    for v in values.filter(|v| *v > 0.0) {
        sum += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(ad_set_id: &str, cost: f64, cpl: f64, day: u32) -> AdSetEntry {
        AdSetEntry {
            ad_set_id: ad_set_id.to_string(),
            ad_id: String::new(),
            ad_creative_id: String::new(),
            account_name: String::new(),
            campaign_name: String::new(),
            campaign_status: String::new(),
            cost,
            cost_per_lead: cpl,
            cost_per_click: 0.0,
            leads: 1.0,
            clicks: 2.0,
            date: Some(Utc.with_ymd_and_hms(2024, 1, day, 6, 0, 0).unwrap()),
        }
    }

    #[test]
    fn avg_cost_per_lead_ignores_non_positive_rates() {
        let entries = vec![
            entry("a", 1.0, 0.0, 1),
            entry("a", 1.0, 20.0, 2),
            entry("a", 1.0, 0.0, 3),
            entry("a", 1.0, 30.0, 4),
        ];
        let metrics = aggregate_entries(&entries);
        // Mean of {20, 30}, not 50/4 and not the naive mean 12.5.
        assert!((metrics.avg_cost_per_lead - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn avg_is_zero_when_no_positive_rates() {
        let entries = vec![entry("a", 1.0, 0.0, 1), entry("a", 1.0, 0.0, 2)];
        let metrics = aggregate_entries(&entries);
        assert!(metrics.avg_cost_per_lead.abs() < f64::EPSILON);
        assert!(metrics.avg_cpc.abs() < f64::EPSILON);
    }

    #[test]
    fn totals_include_zero_entries() {
        let entries = vec![entry("a", 10.0, 5.0, 1), entry("b", 0.0, 0.0, 2)];
        let metrics = aggregate_entries(&entries);
        assert!((metrics.total_cost - 10.0).abs() < f64::EPSILON);
        assert!((metrics.total_leads - 2.0).abs() < f64::EPSILON);
        assert!((metrics.total_clicks - 4.0).abs() < f64::EPSILON);
        assert_eq!(metrics.total_ad_sets, 2);
    }

    #[test]
    fn unique_ad_sets_excludes_empty_ids() {
        let entries = vec![
            entry("a", 1.0, 0.0, 1),
            entry("a", 1.0, 0.0, 2),
            entry("b", 1.0, 0.0, 3),
            entry("", 1.0, 0.0, 4),
        ];
        let metrics = aggregate_entries(&entries);
        assert_eq!(metrics.unique_ad_sets, 2);
        assert_eq!(metrics.total_ad_sets, 4);
    }

    #[test]
    fn date_bounds_span_the_group() {
        let entries = vec![entry("a", 1.0, 0.0, 5), entry("a", 1.0, 0.0, 2)];
        let (first, last) = date_bounds(&entries);
        assert_eq!(first.unwrap().to_rfc3339(), "2024-01-02T06:00:00+00:00");
        assert_eq!(last.unwrap().to_rfc3339(), "2024-01-05T06:00:00+00:00");
    }

    #[test]
    fn date_bounds_skip_unparsed_dates() {
        let mut undated = entry("a", 1.0, 0.0, 1);
        undated.date = None;
        let (first, last) = date_bounds(&[undated]);
        assert_eq!(first, None);
        assert_eq!(last, None);
    }

    #[test]
    fn empty_group_is_all_zero() {
        let metrics = aggregate_entries(&[]);
        assert_eq!(metrics, AggregatedMetrics::default());
    }
}
