//! The `MappingStore` trait and the typed [`SideMapping`] facade used by
//! the resolution and reconciliation paths.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rv_domain::config::MappingStoreConfig;
use rv_domain::error::{Error, Result};
use tracing::warn;

use crate::keys;
use crate::types::{MigrationInfo, ReRegistrationRecord, SideMappingEntry};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Store trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Thin key-value accessor over the side-mapping store.
///
/// All entries are time-bounded; an expired entry is indistinguishable from
/// one that never existed. `scan_keys` walks the keyspace and is for
/// administrative batch work only — never the per-request resolution path.
#[async_trait]
pub trait MappingStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value. `ttl: None` means the entry does not expire.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// All live keys starting with `prefix`.
    async fn scan_keys(&self, prefix: &str) -> Result<Vec<String>>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Typed facade
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Typed access to the side-mapping entries, re-registration records, and
/// the migration-info singleton.
///
/// Clones share the underlying store.
#[derive(Clone)]
pub struct SideMapping {
    store: Arc<dyn MappingStore>,
    mapping_ttl: Duration,
    reregistration_ttl: Duration,
}

impl SideMapping {
    pub fn new(store: Arc<dyn MappingStore>, cfg: &MappingStoreConfig) -> Self {
        Self {
            store,
            mapping_ttl: Duration::from_secs(cfg.mapping_ttl_days * 24 * 60 * 60),
            reregistration_ttl: Duration::from_secs(cfg.reregistration_ttl_days * 24 * 60 * 60),
        }
    }

    // ── hot-path lookups ─────────────────────────────────────────────

    /// Email for a legacy identifier (forward entry), if still live.
    pub async fn email_for_legacy_id(&self, legacy_id: &str) -> Result<Option<String>> {
        self.store.get(&keys::forward_key(legacy_id)).await
    }

    /// Legacy identifier for an email (reverse entry), if still live.
    pub async fn legacy_id_for_email(&self, email: &str) -> Result<Option<String>> {
        self.store.get(&keys::reverse_key(email)).await
    }

    // ── writes ───────────────────────────────────────────────────────

    /// Write the forward and reverse entries for one user.
    ///
    /// The two writes are separate store operations; a reader must tolerate
    /// one side outliving the other after expiry.
    pub async fn insert_pair(&self, legacy_id: &str, email: &str) -> Result<()> {
        self.store
            .set(&keys::forward_key(legacy_id), email, Some(self.mapping_ttl))
            .await?;
        self.store
            .set(&keys::reverse_key(email), legacy_id, Some(self.mapping_ttl))
            .await?;
        Ok(())
    }

    pub async fn record_reregistration(&self, record: &ReRegistrationRecord) -> Result<()> {
        let json = serde_json::to_string(record)?;
        self.store
            .set(
                &keys::reregistration_key(&record.email),
                &json,
                Some(self.reregistration_ttl),
            )
            .await
    }

    // ── re-registration reads ────────────────────────────────────────

    pub async fn reregistration(&self, email: &str) -> Result<Option<ReRegistrationRecord>> {
        match self.store.get(&keys::reregistration_key(email)).await? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(record) => Ok(Some(record)),
                Err(e) => {
                    warn!(email = %email, error = %e, "unparseable re-registration record");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// All live re-registration records (administrative).
    pub async fn reregistrations(&self) -> Result<Vec<ReRegistrationRecord>> {
        let mut records = Vec::new();
        for key in self.store.scan_keys(keys::REREGISTRATION_PREFIX).await? {
            let Some(email) = keys::email_from_reregistration_key(&key) else {
                continue;
            };
            if let Some(record) = self.reregistration(email).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    // ── administrative scans ─────────────────────────────────────────

    /// All live forward entries (administrative).
    ///
    /// A key may expire between the scan and the follow-up read; such
    /// entries are silently dropped.
    pub async fn forward_entries(&self) -> Result<Vec<SideMappingEntry>> {
        let mut entries = Vec::new();
        for key in self.store.scan_keys(keys::FORWARD_PREFIX).await? {
            let Some(legacy_id) = keys::legacy_id_from_forward_key(&key) else {
                continue;
            };
            if let Some(email) = self.store.get(&key).await? {
                entries.push(SideMappingEntry {
                    legacy_id: legacy_id.to_owned(),
                    email,
                });
            }
        }
        Ok(entries)
    }

    /// Find the legacy identifier for an email by scanning forward entries.
    ///
    /// Administrative fallback for when the reverse entry has expired while
    /// the forward entry is still live. Refuses with [`Error::Conflict`]
    /// when more than one legacy identifier maps to the email.
    pub async fn legacy_id_by_email_scan(&self, email: &str) -> Result<Option<String>> {
        let mut found: Vec<String> = Vec::new();
        for entry in self.forward_entries().await? {
            if entry.email.eq_ignore_ascii_case(email) {
                found.push(entry.legacy_id);
            }
        }
        found.sort();
        found.dedup();
        match found.len() {
            0 => Ok(None),
            1 => Ok(found.pop()),
            n => Err(Error::Conflict(format!(
                "{n} legacy identifiers map to {email}"
            ))),
        }
    }

    // ── migration-info singleton ─────────────────────────────────────

    pub async fn migration_info(&self) -> Result<Option<MigrationInfo>> {
        match self.store.get(keys::MIGRATION_INFO_KEY).await? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(info) => Ok(Some(info)),
                Err(e) => {
                    warn!(error = %e, "unparseable migration info record");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// The singleton does not expire — it documents the historical run.
    pub async fn set_migration_info(&self, info: &MigrationInfo) -> Result<()> {
        let json = serde_json::to_string(info)?;
        self.store.set(keys::MIGRATION_INFO_KEY, &json, None).await
    }
}
