use serde::{Deserialize, Serialize};

/// Result of probing the side-mapping and ownership tables for an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationCheck {
    pub has_data: bool,
    pub applications: u64,
    pub subscriptions: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<String>,
}

/// Result of a bulk ownership rewrite.
///
/// `success` is true only when every table updated; per-table failures land
/// in `errors` for manual retry — the rewrite is not transactional across
/// tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationOutcome {
    pub success: bool,
    pub migrated_tables: Vec<String>,
    pub errors: Vec<String>,
}

/// Result of the per-sign-in reconciliation trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInOutcome {
    pub migration_performed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration: Option<MigrationOutcome>,
    pub had_previous_data: bool,
}
