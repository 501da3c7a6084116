//! JSON results files for administrative batch commands.
//!
//! Every batch command prints a one-line summary plus its failures, and
//! writes the full per-item breakdown to a JSON file for later inspection.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-item outcome in a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportItem {
    pub key: String,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Ok,
    Skipped,
    Failed,
}

impl ReportItem {
    pub fn ok(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            status: ItemStatus::Ok,
            detail: None,
        }
    }

    pub fn ok_with(key: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            status: ItemStatus::Ok,
            detail: Some(detail.into()),
        }
    }

    pub fn skipped(key: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            status: ItemStatus::Skipped,
            detail: Some(detail.into()),
        }
    }

    pub fn failed(key: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            status: ItemStatus::Failed,
            detail: Some(detail.into()),
        }
    }
}

/// Full results of one batch command run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub command: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub ok: usize,
    pub skipped: usize,
    pub failed: usize,
    pub items: Vec<ReportItem>,
}

impl RunReport {
    pub fn new(command: &str, started_at: DateTime<Utc>, items: Vec<ReportItem>) -> Self {
        let count = |status: ItemStatus| items.iter().filter(|i| i.status == status).count();
        Self {
            command: command.to_owned(),
            started_at,
            finished_at: Utc::now(),
            ok: count(ItemStatus::Ok),
            skipped: count(ItemStatus::Skipped),
            failed: count(ItemStatus::Failed),
            items,
        }
    }

    pub fn write(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| anyhow::anyhow!("writing results file {path}: {e}"))?;
        Ok(())
    }

    pub fn print_summary(&self) {
        println!(
            "{}: {} ok, {} skipped, {} failed ({} total)",
            self.command,
            self.ok,
            self.skipped,
            self.failed,
            self.items.len()
        );
        for item in self.items.iter().filter(|i| i.status == ItemStatus::Failed) {
            println!("  [FAIL] {}: {}", item.key, item.detail.as_deref().unwrap_or(""));
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
