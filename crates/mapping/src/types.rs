//! Stored record shapes.
//!
//! These are persisted as JSON strings in the side-mapping store. Field
//! names keep the camelCase wire form the original migration wrote, so this
//! implementation can read records already in production.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A forward/reverse mapping pair, as seen by administrative tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideMappingEntry {
    pub legacy_id: String,
    pub email: String,
}

/// Recorded when a directory account is found for an email that already has
/// a legacy mapping under a different identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReRegistrationRecord {
    pub email: String,
    pub production_user_ids: Vec<String>,
    pub detected_at: DateTime<Utc>,
}

/// Singleton metadata describing the historical bulk migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationInfo {
    pub migrated_at: DateTime<Utc>,
    pub total_mappings: u64,
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reregistration_record_uses_camel_case_wire_form() {
        let record = ReRegistrationRecord {
            email: "a@example.com".into(),
            production_user_ids: vec!["user_new".into()],
            detected_at: "2024-03-01T00:00:00Z".parse().unwrap(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"productionUserIds\""));
        assert!(json.contains("\"detectedAt\""));

        let parsed: ReRegistrationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
