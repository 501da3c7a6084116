//! Scan forward mappings and record users who re-registered in the
//! directory under a new identifier.

use chrono::Utc;
use rv_domain::config::Config;
use rv_mapping::types::ReRegistrationRecord;
use tracing::info;

use super::report::{ReportItem, RunReport};
use crate::bootstrap;

pub async fn run(config: &Config, results_path: &str) -> anyhow::Result<()> {
    let directory = bootstrap::build_directory(config)?;
    let mapping = bootstrap::build_mapping(config).await?;

    let entries = mapping.forward_entries().await?;
    info!(
        entries = entries.len(),
        "scanning forward mappings for re-registrations"
    );

    let started_at = Utc::now();
    let mut items = Vec::with_capacity(entries.len());

    for entry in &entries {
        let users = match directory
            .list_users_by_email(&entry.email, config.directory.email_page_size)
            .await
        {
            Ok(users) => users,
            Err(e) => {
                items.push(ReportItem::failed(entry.email.as_str(), e.to_string()));
                continue;
            }
        };

        // Only accounts under a *different* identifier count as a
        // re-registration.
        let ids: Vec<String> = users
            .into_iter()
            .map(|u| u.id)
            .filter(|id| id != &entry.legacy_id)
            .collect();

        if ids.is_empty() {
            items.push(ReportItem::skipped(entry.email.as_str(), "no re-registered account"));
            continue;
        }

        let record = ReRegistrationRecord {
            email: entry.email.clone(),
            production_user_ids: ids,
            detected_at: Utc::now(),
        };
        match mapping.record_reregistration(&record).await {
            Ok(()) => items.push(ReportItem::ok_with(
                entry.email.as_str(),
                format!("{} directory account(s)", record.production_user_ids.len()),
            )),
            Err(e) => items.push(ReportItem::failed(entry.email.as_str(), e.to_string())),
        }
    }

    let report = RunReport::new("detect-reregistered", started_at, items);
    report.write(results_path)?;
    report.print_summary();
    println!("results written to {results_path}");
    Ok(())
}
