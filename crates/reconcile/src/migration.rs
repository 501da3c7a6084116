//! The reconciliation flow: find legacy data for an email, then rewrite
//! ownership rows onto the current identifier.

use std::sync::Arc;

use rv_domain::error::Result;
use rv_domain::trace::TraceEvent;
use rv_mapping::store::SideMapping;
use tracing::{info, warn};

use crate::datastore::{OwnershipStore, OWNERSHIP_TABLES};
use crate::types::{MigrationCheck, MigrationOutcome, SignInOutcome};

/// Orchestrates checks and bulk migrations against the side-mapping store
/// and the relational datastore.
///
/// Not safe to run concurrently for the same identifier pair — the rewrite
/// itself is idempotent, but error reporting could double-count. Operators
/// run reconciliation sequentially.
pub struct Reconciler {
    mapping: SideMapping,
    datastore: Arc<dyn OwnershipStore>,
}

impl Reconciler {
    pub fn new(mapping: SideMapping, datastore: Arc<dyn OwnershipStore>) -> Self {
        Self { mapping, datastore }
    }

    /// Find the legacy identifier for `email` and count its ownership rows.
    ///
    /// Tries the reverse mapping first; when that side has expired, falls
    /// back to scanning the forward keyspace. Refuses with
    /// `Error::Conflict` when the scan finds more than one legacy
    /// identifier for the email.
    pub async fn check_for_migration(&self, email: &str) -> Result<MigrationCheck> {
        let legacy_id = match self.mapping.legacy_id_for_email(email).await? {
            Some(id) => Some(id),
            None => self.mapping.legacy_id_by_email_scan(email).await?,
        };

        let Some(legacy_id) = legacy_id else {
            TraceEvent::MigrationChecked {
                email: email.to_owned(),
                has_data: false,
            }
            .emit();
            return Ok(MigrationCheck {
                has_data: false,
                applications: 0,
                subscriptions: 0,
                legacy_id: None,
            });
        };

        let applications = self
            .datastore
            .count_rows(OWNERSHIP_TABLES[0], &legacy_id)
            .await?;
        let subscriptions = self
            .datastore
            .count_rows(OWNERSHIP_TABLES[1], &legacy_id)
            .await?;
        let has_data = applications > 0 || subscriptions > 0;

        TraceEvent::MigrationChecked {
            email: email.to_owned(),
            has_data,
        }
        .emit();

        Ok(MigrationCheck {
            has_data,
            applications,
            subscriptions,
            legacy_id: Some(legacy_id),
        })
    }

    /// Bulk-rewrite the ownership column in every table.
    ///
    /// Per-table failures are collected independently; `success` is true
    /// only when zero tables failed. Not transactional across tables — a
    /// partial failure leaves the remaining tables for manual retry.
    pub async fn migrate(&self, old_id: &str, new_id: &str) -> MigrationOutcome {
        let mut migrated_tables = Vec::new();
        let mut errors = Vec::new();

        for table in OWNERSHIP_TABLES {
            match self.datastore.reassign(table, old_id, new_id).await {
                Ok(rows) => {
                    info!(table, rows, old_id, new_id, "ownership rows reassigned");
                    migrated_tables.push(table.to_owned());
                }
                Err(e) => {
                    warn!(table, error = %e, "ownership reassignment failed");
                    errors.push(format!("{table}: {e}"));
                }
            }
        }

        let outcome = MigrationOutcome {
            success: errors.is_empty(),
            migrated_tables,
            errors,
        };

        TraceEvent::MigrationApplied {
            old_id: old_id.to_owned(),
            new_id: new_id.to_owned(),
            tables_migrated: outcome.migrated_tables.len(),
            tables_failed: outcome.errors.len(),
        }
        .emit();

        outcome
    }

    /// Best-effort reconciliation trigger, intended to run once per
    /// sign-in. Not exactly-once — a repeat run no-ops because the rewrite
    /// is idempotent.
    pub async fn handle_sign_in(&self, id: &str, email: &str) -> Result<SignInOutcome> {
        let check = self.check_for_migration(email).await?;

        let Some(legacy_id) = check.legacy_id.clone() else {
            return Ok(SignInOutcome {
                migration_performed: false,
                migration: None,
                had_previous_data: false,
            });
        };

        if !check.has_data {
            return Ok(SignInOutcome {
                migration_performed: false,
                migration: None,
                had_previous_data: false,
            });
        }

        if legacy_id == id {
            // Rows are already keyed by the current identifier.
            return Ok(SignInOutcome {
                migration_performed: false,
                migration: None,
                had_previous_data: true,
            });
        }

        let migration = self.migrate(&legacy_id, id).await;
        Ok(SignInOutcome {
            migration_performed: true,
            migration: Some(migration),
            had_previous_data: true,
        })
    }
}
