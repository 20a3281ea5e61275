//! `sync` and `adsets` command handlers: fetch, aggregate, report.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use creatives_core::{AdSetGroup, AppConfig, GroupedCreative, LibraryManifest};
use creatives_pipeline::{build_ad_set_groups, PipelineResult};
use creatives_sheets::SheetsClient;

/// JSON report emitted by a sync run, consumed by the downstream web UI.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SyncReport {
    generated_at: DateTime<Utc>,
    input_rows: usize,
    skipped_rows: usize,
    creatives: Vec<GroupedCreative>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ad_sets: Option<Vec<AdSetGroup>>,
}

/// Fetch the sheet, run the pipeline, and emit the creative report.
pub async fn run_sync(config: &AppConfig, out: Option<&Path>, limit: usize) -> anyhow::Result<()> {
    let (result, input_rows) = fetch_and_aggregate(config).await?;

    let report = SyncReport {
        generated_at: Utc::now(),
        input_rows,
        skipped_rows: result.skipped_rows,
        creatives: result.creatives,
        ad_sets: None,
    };

    emit(&report, out, limit)
}

/// Like [`run_sync`], but additionally builds the ad-set grouping index.
pub async fn run_adsets(config: &AppConfig, out: Option<&Path>) -> anyhow::Result<()> {
    let (result, input_rows) = fetch_and_aggregate(config).await?;
    let ad_sets = build_ad_set_groups(&result.creatives);

    tracing::info!(ad_set_groups = ad_sets.len(), "built ad-set index");

    let report = SyncReport {
        generated_at: Utc::now(),
        input_rows,
        skipped_rows: result.skipped_rows,
        creatives: result.creatives,
        ad_sets: Some(ad_sets),
    };

    emit(&report, out, 20)
}

/// Shared fetch + pipeline wiring for both commands.
async fn fetch_and_aggregate(config: &AppConfig) -> anyhow::Result<(PipelineResult, usize)> {
    let manifest = load_manifest(config);

    let client = SheetsClient::new(&config.sheets_api_key, config.request_timeout_secs)?;
    let rows = client
        .fetch_rows(&config.spreadsheet_id, &config.sheet_range)
        .await
        .context("failed to fetch performance sheet")?;
    let input_rows = rows.len();

    let result = creatives_pipeline::run(&rows, &manifest);
    tracing::info!(
        input_rows,
        creatives = result.creatives.len(),
        skipped_rows = result.skipped_rows,
        "aggregation complete"
    );

    Ok((result, input_rows))
}

/// Load the library manifest, treating a missing file as an empty library.
///
/// A missing manifest is the normal state on machines that only read the
/// sheet; anything else (unreadable file, parse failure) is worth a warning
/// but still should not block a sync.
fn load_manifest(config: &AppConfig) -> LibraryManifest {
    match LibraryManifest::load(&config.library_path) {
        Ok(manifest) => {
            tracing::debug!(
                path = %config.library_path.display(),
                entries = manifest.len(),
                "loaded library manifest"
            );
            manifest
        }
        Err(creatives_core::ConfigError::LibraryFileIo { ref source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            tracing::debug!(
                path = %config.library_path.display(),
                "no library manifest; all creatives will report as unsaved"
            );
            LibraryManifest::empty()
        }
        Err(e) => {
            tracing::warn!(error = %e, "library manifest unusable; continuing without it");
            LibraryManifest::empty()
        }
    }
}

/// Write the JSON report to `out`, or print a human summary to stdout.
fn emit(report: &SyncReport, out: Option<&Path>, limit: usize) -> anyhow::Result<()> {
    if let Some(path) = out {
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote report");
        return Ok(());
    }

    println!(
        "{} creatives from {} rows ({} skipped)",
        report.creatives.len(),
        report.input_rows,
        report.skipped_rows
    );
    for creative in report.creatives.iter().take(limit) {
        let updated = creative
            .last_updated
            .map_or_else(|| "unknown".to_string(), |d| d.format("%Y-%m-%d").to_string());
        println!(
            "  {:<24} {:<32} cost ${:>10.2}  CPL ${:>8.2}  ad sets {:>3}  updated {}",
            creative.image_asset_id,
            truncate(&creative.image_asset_name, 32),
            creative.aggregated.total_cost,
            creative.aggregated.avg_cost_per_lead,
            creative.aggregated.unique_ad_sets,
            updated
        );
    }
    if report.creatives.len() > limit {
        println!("  ... and {} more", report.creatives.len() - limit);
    }
    if let Some(ad_sets) = &report.ad_sets {
        println!("{} ad-set groups:", ad_sets.len());
        for group in ad_sets {
            println!(
                "  {:<48} members {:>3}  active {:>3}  paused {:>3}  saved {:>3}",
                truncate(&group.key, 48),
                group.creatives.len(),
                group.delivery.active,
                group.delivery.paused,
                group.workflow.saved
            );
        }
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
