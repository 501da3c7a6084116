use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Relational datastore (system of record)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatastoreConfig {
    #[serde(default = "d_ds_url")]
    pub base_url: String,
    /// Environment variable holding the datastore service key.
    #[serde(default = "d_service_env")]
    pub service_key_env: String,
    /// Fixed request timeout for datastore calls.
    #[serde(default = "d_30000")]
    pub timeout_ms: u64,
    /// Ownership column rewritten during migration.
    #[serde(default = "d_owner_column")]
    pub owner_column: String,
}

impl Default for DatastoreConfig {
    fn default() -> Self {
        Self {
            base_url: d_ds_url(),
            service_key_env: d_service_env(),
            timeout_ms: 30_000,
            owner_column: d_owner_column(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_ds_url() -> String {
    "http://127.0.0.1:54321".into()
}
fn d_service_env() -> String {
    "RV_DATASTORE_SERVICE_KEY".into()
}
fn d_30000() -> u64 {
    30_000
}
fn d_owner_column() -> String {
    "user_id".into()
}
