//! Bulk-populate the side-mapping store from the legacy CSV export.

use chrono::Utc;
use rv_domain::config::Config;
use rv_mapping::types::MigrationInfo;
use tracing::{info, warn};

use super::csv;
use super::report::{ReportItem, RunReport};
use crate::bootstrap;

pub async fn run(config: &Config, csv_path: &str, results_path: &str) -> anyhow::Result<()> {
    let mapping = bootstrap::build_mapping(config).await?;
    let raw = std::fs::read_to_string(csv_path)
        .map_err(|e| anyhow::anyhow!("reading {csv_path}: {e}"))?;
    let rows = csv::parse(&raw)?;
    info!(rows = rows.len(), "seeding side-mapping entries");

    let started_at = Utc::now();
    let mut items = Vec::with_capacity(rows.len());

    for row in &rows {
        let legacy_id = field(row, "id");
        let email = field(row, "email");

        if legacy_id.is_empty() {
            items.push(ReportItem::skipped(email, "missing legacy identifier"));
            continue;
        }
        if email.is_empty() || !email.contains('@') {
            items.push(ReportItem::skipped(legacy_id, "missing or malformed email"));
            continue;
        }

        match mapping.insert_pair(legacy_id, email).await {
            Ok(()) => items.push(ReportItem::ok(legacy_id)),
            Err(e) => items.push(ReportItem::failed(legacy_id, e.to_string())),
        }
    }

    let report = RunReport::new("seed-mappings", started_at, items);

    // Record the singleton metadata for later tooling.
    let migration_info = MigrationInfo {
        migrated_at: Utc::now(),
        total_mappings: report.ok as u64,
        source: csv_path.to_owned(),
    };
    if let Err(e) = mapping.set_migration_info(&migration_info).await {
        warn!(error = %e, "failed to write migration info singleton");
    }

    report.write(results_path)?;
    report.print_summary();
    println!("results written to {results_path}");
    Ok(())
}

fn field<'a>(row: &'a csv::CsvRow, name: &str) -> &'a str {
    row.get(name).map(String::as_str).unwrap_or("").trim()
}
