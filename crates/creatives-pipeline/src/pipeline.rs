//! End-to-end pipeline run: group, sort, join library status.

use creatives_core::{GroupedCreative, LibraryStatusLookup, RawRow};

use crate::group::group_rows;

/// Output of one pipeline run.
#[derive(Debug)]
pub struct PipelineResult {
    /// Grouped creatives, most recently updated first.
    pub creatives: Vec<GroupedCreative>,
    /// Rows dropped for lacking an image asset id.
    pub skipped_rows: usize,
}

/// Runs the full synchronous pipeline over a freshly fetched row list.
///
/// Grouping, metric reduction, the descending `last_updated` sort, and the
/// library-status join all happen here; the row fetch and the manifest load
/// are the caller's async/IO concerns. Re-running on the same input produces
/// identical output.
#[must_use]
pub fn run(rows: &[RawRow], lookup: &impl LibraryStatusLookup) -> PipelineResult {
    let outcome = group_rows(rows);
    let mut creatives = outcome.creatives;

    sort_creatives(&mut creatives);
    apply_library_status(&mut creatives, lookup);

    if outcome.skipped_rows > 0 {
        tracing::warn!(
            skipped_rows = outcome.skipped_rows,
            "dropped rows without an image asset id"
        );
    }

    PipelineResult {
        creatives,
        skipped_rows: outcome.skipped_rows,
    }
}

/// Sorts creatives descending by `last_updated`.
///
/// The sort is stable, so ties (and undated creatives, which sort last) keep
/// their first-encounter order. The library and records views rely on this
/// ordering; it is re-applied on every run rather than assumed from
/// insertion order.
pub fn sort_creatives(creatives: &mut [GroupedCreative]) {
    creatives.sort_by(|a, b| match (a.last_updated, b.last_updated) {
        (Some(a_dt), Some(b_dt)) => b_dt.cmp(&a_dt),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Joins library workflow status onto each creative after grouping.
pub fn apply_library_status(
    creatives: &mut [GroupedCreative],
    lookup: &impl LibraryStatusLookup,
) {
    for creative in creatives {
        let status = lookup.lookup(&creative.image_asset_id, &creative.image_url);
        creative.library_status = status;
        creative.saved_in_library = status.is_some();
    }
}

#[cfg(test)]
mod tests {
    use creatives_core::{LibraryEntry, LibraryManifest, LibraryStatus};
    use serde_json::json;

    use super::*;

    fn row(asset_id: &str, cost: &str, leads: &str, cpl: &str, date: &str) -> RawRow {
        let mut r = RawRow::new();
        r.insert("imageAssetId".to_string(), json!(asset_id));
        r.insert("cost".to_string(), json!(cost));
        r.insert("websiteLeads".to_string(), json!(leads));
        r.insert("costPerWebsiteLead".to_string(), json!(cpl));
        r.insert("date".to_string(), json!(date));
        r
    }

    /// The concrete end-to-end scenario: two rows for one asset plus one
    /// keyless row.
    #[test]
    fn three_row_scenario() {
        let rows = vec![
            row("A", "$10.00", "2", "5", "01/01/2024"),
            row("A", "$20", "0", "0", "01/02/2024"),
            row("", "$5", "", "", "01/01/2024"),
        ];
        let result = run(&rows, &LibraryManifest::empty());

        assert_eq!(result.skipped_rows, 1);
        assert_eq!(result.creatives.len(), 1);
        let creative = &result.creatives[0];
        assert_eq!(creative.image_asset_id, "A");
        assert_eq!(creative.aggregated.total_ad_sets, 2);
        assert!((creative.aggregated.total_cost - 30.0).abs() < f64::EPSILON);
        assert!((creative.aggregated.avg_cost_per_lead - 5.0).abs() < f64::EPSILON);
        assert!((creative.aggregated.total_leads - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn output_is_sorted_most_recently_updated_first() {
        let rows = vec![
            row("stale", "$1", "0", "0", "01/01/2024"),
            row("fresh", "$1", "0", "0", "03/01/2024"),
            row("middle", "$1", "0", "0", "02/01/2024"),
        ];
        let result = run(&rows, &LibraryManifest::empty());
        let ids: Vec<&str> = result
            .creatives
            .iter()
            .map(|c| c.image_asset_id.as_str())
            .collect();
        assert_eq!(ids, vec!["fresh", "middle", "stale"]);
    }

    #[test]
    fn ties_keep_first_encounter_order() {
        let rows = vec![
            row("first", "$1", "0", "0", "01/01/2024"),
            row("second", "$1", "0", "0", "01/01/2024"),
            row("third", "$1", "0", "0", "01/01/2024"),
        ];
        let result = run(&rows, &LibraryManifest::empty());
        let ids: Vec<&str> = result
            .creatives
            .iter()
            .map(|c| c.image_asset_id.as_str())
            .collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn undated_creatives_sort_last() {
        let rows = vec![
            row("undated", "$1", "0", "0", "not a date"),
            row("dated", "$1", "0", "0", "01/01/2024"),
        ];
        let result = run(&rows, &LibraryManifest::empty());
        assert_eq!(result.creatives[0].image_asset_id, "dated");
        assert_eq!(result.creatives[1].image_asset_id, "undated");
    }

    #[test]
    fn conservation_of_entries() {
        let rows = vec![
            row("a", "$1", "0", "0", "01/01/2024"),
            row("b", "$1", "0", "0", "01/01/2024"),
            row("a", "$1", "0", "0", "01/02/2024"),
            row("", "$1", "0", "0", "01/02/2024"),
        ];
        let result = run(&rows, &LibraryManifest::empty());
        let grouped: usize = result
            .creatives
            .iter()
            .map(|c| c.aggregated.total_ad_sets)
            .sum();
        assert_eq!(grouped + result.skipped_rows, rows.len());
        assert_eq!(grouped, 3);
    }

    #[test]
    fn rerun_is_idempotent() {
        let rows = vec![
            row("a", "$10", "1", "10", "01/02/2024"),
            row("b", "$20", "2", "10", "01/01/2024"),
            row("a", "$5", "0", "0", "01/03/2024"),
        ];
        let first = run(&rows, &LibraryManifest::empty());
        let second = run(&rows, &LibraryManifest::empty());
        assert_eq!(first.creatives, second.creatives);
        assert_eq!(first.skipped_rows, second.skipped_rows);
    }

    #[test]
    fn library_status_joins_after_grouping() {
        let manifest = LibraryManifest::from_entries(&[LibraryEntry {
            asset_id: Some("a".to_string()),
            image_url: None,
            filename: None,
            status: LibraryStatus::Saved,
        }])
        .unwrap();

        let rows = vec![
            row("a", "$1", "0", "0", "01/01/2024"),
            row("b", "$1", "0", "0", "01/01/2024"),
        ];
        let result = run(&rows, &manifest);
        let a = result
            .creatives
            .iter()
            .find(|c| c.image_asset_id == "a")
            .unwrap();
        let b = result
            .creatives
            .iter()
            .find(|c| c.image_asset_id == "b")
            .unwrap();
        assert!(a.saved_in_library);
        assert_eq!(a.library_status, Some(LibraryStatus::Saved));
        assert!(!b.saved_in_library);
        assert_eq!(b.library_status, None);
    }
}
