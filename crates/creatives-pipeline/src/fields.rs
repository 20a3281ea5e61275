//! Tolerant cell access over raw sheet rows.
//!
//! Column headers are inconsistent across the upstream data sources, so text
//! and metric lookups take an ordered list of candidate headers and use the
//! first non-empty match. Numeric cells are parse-or-zero: currency symbols,
//! thousands separators, and garbage all coerce to `0.0` rather than failing
//! a pipeline run over one bad cell.

use creatives_core::RawRow;
use serde_json::Value;

/// Resolves a text field by trying each candidate header in priority order.
///
/// Returns the first non-empty (after trimming) value, or an empty string
/// when no candidate matches.
pub(crate) fn field_text(row: &RawRow, candidates: &[&str]) -> String {
    for key in candidates {
        if let Some(value) = row.get(*key) {
            let text = cell_text(value);
            if !text.is_empty() {
                return text;
            }
        }
    }
    String::new()
}

/// Resolves a numeric field by trying each candidate header in priority
/// order; the first cell that parses to a meaningful number wins.
///
/// A cell that is present but empty or unparseable counts as no match so a
/// later candidate can still supply the value. Returns `0.0` when nothing
/// matches.
pub(crate) fn field_metric(row: &RawRow, candidates: &[&str]) -> f64 {
    for key in candidates {
        if let Some(value) = row.get(*key) {
            if let Some(parsed) = try_parse_metric(value) {
                return parsed;
            }
        }
    }
    0.0
}

/// Parse-or-zero conversion for one cell.
pub(crate) fn parse_metric(value: &Value) -> f64 {
    try_parse_metric(value).unwrap_or(0.0)
}

/// Renders a cell as trimmed text. Native numbers print without a JSON quote
/// wrapper; null and structured values render empty.
pub(crate) fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// `Some(n)` when the cell holds a usable number, `None` otherwise.
///
/// Strings are stripped of `$`, `,`, and whitespace before parsing. A
/// non-finite result (NaN, infinity) is treated as unparseable.
fn try_parse_metric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
                .collect();
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn parse_metric_handles_currency_strings() {
        assert!((parse_metric(&json!("$1,234.56")) - 1234.56).abs() < f64::EPSILON);
        assert!((parse_metric(&json!(" $10.00 ")) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_metric_passes_native_numbers_through() {
        assert!((parse_metric(&json!(42.5)) - 42.5).abs() < f64::EPSILON);
        assert!((parse_metric(&json!(7)) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_metric_coerces_garbage_to_zero() {
        assert!(parse_metric(&json!("")).abs() < f64::EPSILON);
        assert!(parse_metric(&json!("n/a")).abs() < f64::EPSILON);
        assert!(parse_metric(&Value::Null).abs() < f64::EPSILON);
        assert!(parse_metric(&json!({"nested": true})).abs() < f64::EPSILON);
    }

    #[test]
    fn field_text_uses_first_non_empty_candidate() {
        let r = row(&[("AdSet ID", json!("")), ("Adset ID", json!("as-9"))]);
        assert_eq!(field_text(&r, &["Ad Set ID", "AdSet ID", "Adset ID"]), "as-9");
    }

    #[test]
    fn field_text_defaults_to_empty() {
        let r = row(&[("Other", json!("x"))]);
        assert_eq!(field_text(&r, &["Ad Set ID"]), "");
    }

    #[test]
    fn field_text_trims_whitespace() {
        let r = row(&[("Ad Set ID", json!("  as-1  "))]);
        assert_eq!(field_text(&r, &["Ad Set ID"]), "as-1");
    }

    #[test]
    fn field_metric_skips_unparseable_candidates() {
        let r = row(&[("Cost", json!("")), ("Amount Spent", json!("$3.50"))]);
        assert!((field_metric(&r, &["Cost", "Amount Spent"]) - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn field_metric_defaults_to_zero() {
        let r = row(&[]);
        assert!(field_metric(&r, &["Cost"]).abs() < f64::EPSILON);
    }
}
