use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rv_domain::config::MappingStoreConfig;
use rv_mapping::keys;
use rv_mapping::memory::{ManualClock, MemoryMappingStore};
use rv_mapping::store::{MappingStore, SideMapping};
use rv_mapping::types::{MigrationInfo, ReRegistrationRecord};

fn manual_mapping() -> (SideMapping, Arc<MemoryMappingStore>, ManualClock) {
    let clock = ManualClock::new(Utc::now());
    let store = Arc::new(MemoryMappingStore::with_clock(Arc::new(clock.clone())));
    let mapping = SideMapping::new(store.clone(), &MappingStoreConfig::default());
    (mapping, store, clock)
}

#[tokio::test]
async fn pair_lookup_both_directions() {
    let (mapping, _, _) = manual_mapping();
    mapping.insert_pair("user_ABC", "a@example.com").await.unwrap();

    assert_eq!(
        mapping.email_for_legacy_id("user_ABC").await.unwrap(),
        Some("a@example.com".into())
    );
    assert_eq!(
        mapping.legacy_id_for_email("a@example.com").await.unwrap(),
        Some("user_ABC".into())
    );
    assert_eq!(mapping.email_for_legacy_id("user_OTHER").await.unwrap(), None);
}

#[tokio::test]
async fn mapping_hits_at_day_29_and_misses_at_day_31() {
    let (mapping, _, clock) = manual_mapping();
    mapping.insert_pair("user_ABC", "a@example.com").await.unwrap();

    clock.advance(chrono::Duration::days(29));
    assert_eq!(
        mapping.email_for_legacy_id("user_ABC").await.unwrap(),
        Some("a@example.com".into())
    );

    clock.advance(chrono::Duration::days(2));
    assert_eq!(mapping.email_for_legacy_id("user_ABC").await.unwrap(), None);
    assert_eq!(
        mapping.legacy_id_for_email("a@example.com").await.unwrap(),
        None
    );
}

#[tokio::test]
async fn expired_entry_indistinguishable_from_absent() {
    let (mapping, store, clock) = manual_mapping();
    mapping.insert_pair("user_ABC", "a@example.com").await.unwrap();
    clock.advance(chrono::Duration::days(31));

    // Expired entries also disappear from scans.
    assert!(store.scan_keys(keys::FORWARD_PREFIX).await.unwrap().is_empty());
    assert!(mapping.forward_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn scan_fallback_survives_one_sided_expiry() {
    let (mapping, store, clock) = manual_mapping();
    mapping.insert_pair("user_ABC", "a@example.com").await.unwrap();

    // Simulate the reverse side having been written with a shorter life
    // (e.g. rewritten by an earlier partial run).
    store
        .set(
            &keys::reverse_key("a@example.com"),
            "user_ABC",
            Some(Duration::from_secs(60)),
        )
        .await
        .unwrap();

    clock.advance(chrono::Duration::days(1));
    assert_eq!(
        mapping.legacy_id_for_email("a@example.com").await.unwrap(),
        None
    );
    // The forward side is still live, so the administrative scan finds it.
    assert_eq!(
        mapping
            .legacy_id_by_email_scan("a@example.com")
            .await
            .unwrap(),
        Some("user_ABC".into())
    );
}

#[tokio::test]
async fn scan_fallback_matches_email_case_insensitively() {
    let (mapping, _, _) = manual_mapping();
    mapping.insert_pair("user_ABC", "A@Example.com").await.unwrap();

    assert_eq!(
        mapping
            .legacy_id_by_email_scan("a@example.com")
            .await
            .unwrap(),
        Some("user_ABC".into())
    );
}

#[tokio::test]
async fn duplicate_legacy_ids_for_one_email_conflict() {
    let (mapping, _, _) = manual_mapping();
    mapping.insert_pair("user_ONE", "a@example.com").await.unwrap();
    mapping.insert_pair("user_TWO", "a@example.com").await.unwrap();

    let err = mapping
        .legacy_id_by_email_scan("a@example.com")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("conflict"));
}

#[tokio::test]
async fn reregistration_record_roundtrip_and_expiry() {
    let (mapping, _, clock) = manual_mapping();
    let record = ReRegistrationRecord {
        email: "a@example.com".into(),
        production_user_ids: vec!["user_new1".into(), "user_new2".into()],
        detected_at: Utc::now(),
    };
    mapping.record_reregistration(&record).await.unwrap();

    let read = mapping.reregistration("a@example.com").await.unwrap().unwrap();
    assert_eq!(read.production_user_ids, record.production_user_ids);

    let all = mapping.reregistrations().await.unwrap();
    assert_eq!(all.len(), 1);

    // The record carries the short (7-day) TTL.
    clock.advance(chrono::Duration::days(8));
    assert!(mapping.reregistration("a@example.com").await.unwrap().is_none());
    assert!(mapping.reregistrations().await.unwrap().is_empty());
}

#[tokio::test]
async fn migration_info_singleton_does_not_expire() {
    let (mapping, _, clock) = manual_mapping();
    let info = MigrationInfo {
        migrated_at: Utc::now(),
        total_mappings: 128,
        source: "export.csv".into(),
    };
    mapping.set_migration_info(&info).await.unwrap();

    clock.advance(chrono::Duration::days(365));
    let read = mapping.migration_info().await.unwrap().unwrap();
    assert_eq!(read.total_mappings, 128);
    assert_eq!(read.source, "export.csv");
}

#[tokio::test]
async fn unparseable_reregistration_record_reads_as_absent() {
    let (mapping, store, _) = manual_mapping();
    store
        .set(&keys::reregistration_key("a@example.com"), "not json", None)
        .await
        .unwrap();

    assert!(mapping.reregistration("a@example.com").await.unwrap().is_none());
}
