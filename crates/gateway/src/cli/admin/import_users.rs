//! Bulk-create directory users from the legacy CSV export.

use chrono::Utc;
use rv_directory::types::CreateUserRequest;
use rv_domain::config::Config;
use tracing::info;

use super::csv;
use super::report::{ReportItem, RunReport};
use crate::bootstrap;

pub async fn run(config: &Config, csv_path: &str, results_path: &str) -> anyhow::Result<()> {
    let directory = bootstrap::build_directory(config)?;
    let raw = std::fs::read_to_string(csv_path)
        .map_err(|e| anyhow::anyhow!("reading {csv_path}: {e}"))?;
    let rows = csv::parse(&raw)?;
    info!(rows = rows.len(), "importing users into the directory");

    let started_at = Utc::now();
    let mut items = Vec::with_capacity(rows.len());

    for row in &rows {
        let legacy_id = field(row, "id");
        let email = field(row, "email");
        let key = if email.is_empty() { legacy_id } else { email };

        if email.is_empty() || !email.contains('@') {
            items.push(ReportItem::skipped(key, "missing or malformed email"));
            continue;
        }

        let req = CreateUserRequest {
            email_address: vec![email.to_owned()],
            first_name: non_empty(row.get("first_name")),
            last_name: non_empty(row.get("last_name")),
            external_id: non_empty(row.get("id")),
        };

        match directory.create_user(req).await {
            Ok(user) => items.push(ReportItem::ok_with(email, format!("created {}", user.id))),
            Err(e) => items.push(ReportItem::failed(email, e.to_string())),
        }
    }

    let report = RunReport::new("import-users", started_at, items);
    report.write(results_path)?;
    report.print_summary();
    println!("results written to {results_path}");
    Ok(())
}

fn field<'a>(row: &'a csv::CsvRow, name: &str) -> &'a str {
    row.get(name).map(String::as_str).unwrap_or("").trim()
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
