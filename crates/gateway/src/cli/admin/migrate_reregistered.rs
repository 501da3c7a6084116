//! Bulk-migrate ownership rows for recorded re-registrations.
//!
//! A record with more than one directory identifier is ambiguous and is
//! reported as a failure for manual resolution; the command never guesses.

use chrono::Utc;
use rv_domain::config::Config;
use rv_reconcile::Reconciler;
use tracing::info;

use super::report::{ReportItem, RunReport};
use crate::bootstrap;

pub async fn run(config: &Config, results_path: &str, dry_run: bool) -> anyhow::Result<()> {
    let mapping = bootstrap::build_mapping(config).await?;
    let datastore = bootstrap::build_datastore(config)?;
    let reconciler = Reconciler::new(mapping.clone(), datastore);

    let records = mapping.reregistrations().await?;
    info!(
        records = records.len(),
        dry_run, "migrating re-registered users"
    );

    let started_at = Utc::now();
    let mut items = Vec::with_capacity(records.len());

    for record in &records {
        let new_id = match record.production_user_ids.as_slice() {
            [single] => single.clone(),
            [] => {
                items.push(ReportItem::skipped(
                    record.email.as_str(),
                    "record holds no directory identifier",
                ));
                continue;
            }
            many => {
                items.push(ReportItem::failed(
                    record.email.as_str(),
                    format!("{} directory identifiers — resolve manually", many.len()),
                ));
                continue;
            }
        };

        let legacy_id = match lookup_legacy_id(&mapping, &record.email).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                items.push(ReportItem::skipped(record.email.as_str(), "no legacy mapping (expired?)"));
                continue;
            }
            Err(e) => {
                items.push(ReportItem::failed(record.email.as_str(), e.to_string()));
                continue;
            }
        };

        if legacy_id == new_id {
            items.push(ReportItem::skipped(record.email.as_str(), "identifiers already match"));
            continue;
        }

        if dry_run {
            items.push(ReportItem::ok_with(
                record.email.as_str(),
                format!("would migrate {legacy_id} -> {new_id}"),
            ));
            continue;
        }

        let outcome = reconciler.migrate(&legacy_id, &new_id).await;
        if outcome.success {
            items.push(ReportItem::ok_with(
                record.email.as_str(),
                format!(
                    "migrated {legacy_id} -> {new_id} ({})",
                    outcome.migrated_tables.join(", ")
                ),
            ));
        } else {
            items.push(ReportItem::failed(record.email.as_str(), outcome.errors.join("; ")));
        }
    }

    let report = RunReport::new("migrate-reregistered", started_at, items);
    report.write(results_path)?;
    report.print_summary();
    println!("results written to {results_path}");
    Ok(())
}

async fn lookup_legacy_id(
    mapping: &rv_mapping::store::SideMapping,
    email: &str,
) -> rv_domain::error::Result<Option<String>> {
    match mapping.legacy_id_for_email(email).await? {
        Some(id) => Ok(Some(id)),
        None => mapping.legacy_id_by_email_scan(email).await,
    }
}
