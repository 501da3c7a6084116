//! Administrative batch commands — the offline migration scripts.
//!
//! Each batch command prints a summary and writes a JSON results file;
//! per-item failures are reported, not fatal, matching how the original
//! migration scripts behaved.

mod csv;
mod detect;
mod import_users;
mod migrate_reregistered;
mod report;
mod seed_mappings;

use std::sync::Arc;

use rv_domain::config::Config;

use super::AdminCommand;
use crate::bootstrap;

pub async fn run(config: Arc<Config>, cmd: AdminCommand) -> anyhow::Result<()> {
    match cmd {
        AdminCommand::ImportUsers { csv, results } => {
            import_users::run(&config, &csv, &results).await
        }
        AdminCommand::SeedMappings { csv, results } => {
            seed_mappings::run(&config, &csv, &results).await
        }
        AdminCommand::DetectReregistered { results } => detect::run(&config, &results).await,
        AdminCommand::MigrateReregistered { results, dry_run } => {
            migrate_reregistered::run(&config, &results, dry_run).await
        }
        AdminCommand::Check { email } => check(&config, &email).await,
        AdminCommand::Migrate { old_id, new_id } => migrate(&config, &old_id, &new_id).await,
    }
}

async fn check(config: &Config, email: &str) -> anyhow::Result<()> {
    let reconciler = bootstrap::build_reconciler(config).await?;
    let check = reconciler.check_for_migration(email).await?;
    println!("{}", serde_json::to_string_pretty(&check)?);
    Ok(())
}

async fn migrate(config: &Config, old_id: &str, new_id: &str) -> anyhow::Result<()> {
    let reconciler = bootstrap::build_reconciler(config).await?;
    let outcome = reconciler.migrate(old_id, new_id).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
