use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Side-mapping store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingStoreConfig {
    #[serde(default = "d_backend")]
    pub backend: MappingBackend,
    #[serde(default = "d_redis_url")]
    pub redis_url: String,
    #[serde(default = "d_100")]
    pub connect_timeout_ms: u64,
    #[serde(default = "d_1")]
    pub connect_retries: usize,
    /// TTL applied to forward/reverse mapping pairs, in days.
    #[serde(default = "d_30")]
    pub mapping_ttl_days: u64,
    /// TTL applied to re-registration records, in days.
    #[serde(default = "d_7")]
    pub reregistration_ttl_days: u64,
}

/// Which store implementation backs the side-mapping.
///
/// `memory` keeps entries in-process only — local development and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingBackend {
    Redis,
    Memory,
}

impl Default for MappingStoreConfig {
    fn default() -> Self {
        Self {
            backend: MappingBackend::Redis,
            redis_url: d_redis_url(),
            connect_timeout_ms: 100,
            connect_retries: 1,
            mapping_ttl_days: 30,
            reregistration_ttl_days: 7,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_backend() -> MappingBackend {
    MappingBackend::Redis
}
fn d_redis_url() -> String {
    "redis://127.0.0.1:6379".into()
}
fn d_100() -> u64 {
    100
}
fn d_1() -> usize {
    1
}
fn d_30() -> u64 {
    30
}
fn d_7() -> u64 {
    7
}
