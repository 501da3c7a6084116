use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use rv_directory::provider::DirectoryProvider;
use rv_directory::types::{CreateUserRequest, DirectoryUser, EmailAddress};
use rv_domain::config::MappingStoreConfig;
use rv_domain::error::{Error, Result};
use rv_mapping::memory::MemoryMappingStore;
use rv_mapping::store::SideMapping;
use rv_resolver::{IdentityResolver, ReRegistrationDetector};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Fake directory
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Default)]
struct FakeDirectory {
    users: RwLock<HashMap<String, DirectoryUser>>,
    unreachable: RwLock<bool>,
}

impl FakeDirectory {
    fn with_user(self, id: &str, email: &str, first: Option<&str>, last: Option<&str>) -> Self {
        self.users.write().insert(
            id.to_owned(),
            DirectoryUser {
                id: id.to_owned(),
                email_addresses: vec![EmailAddress {
                    id: Some(format!("em_{id}")),
                    email_address: email.to_owned(),
                }],
                primary_email_address_id: Some(format!("em_{id}")),
                first_name: first.map(Into::into),
                last_name: last.map(Into::into),
            },
        );
        self
    }

    fn set_unreachable(&self, value: bool) {
        *self.unreachable.write() = value;
    }

    fn check_reachable(&self) -> Result<()> {
        if *self.unreachable.read() {
            Err(Error::Http("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DirectoryProvider for FakeDirectory {
    async fn fetch_user(&self, id: &str) -> Result<Option<DirectoryUser>> {
        self.check_reachable()?;
        Ok(self.users.read().get(id).cloned())
    }

    async fn list_users_by_email(&self, email: &str, limit: u32) -> Result<Vec<DirectoryUser>> {
        self.check_reachable()?;
        Ok(self
            .users
            .read()
            .values()
            .filter(|u| {
                u.primary_email()
                    .map(|e| e.eq_ignore_ascii_case(email))
                    .unwrap_or(false)
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create_user(&self, req: CreateUserRequest) -> Result<DirectoryUser> {
        self.check_reachable()?;
        let id = format!("user_created_{}", self.users.read().len());
        let user = DirectoryUser {
            id: id.clone(),
            email_addresses: req
                .email_address
                .iter()
                .map(|e| EmailAddress {
                    id: None,
                    email_address: e.clone(),
                })
                .collect(),
            primary_email_address_id: None,
            first_name: req.first_name,
            last_name: req.last_name,
        };
        self.users.write().insert(id, user.clone());
        Ok(user)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Harness
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn mapping() -> SideMapping {
    SideMapping::new(
        Arc::new(MemoryMappingStore::new()),
        &MappingStoreConfig::default(),
    )
}

fn resolver(directory: Arc<FakeDirectory>, mapping: &SideMapping) -> IdentityResolver {
    IdentityResolver::new(directory, mapping.clone())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Resolution chain
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn directory_hit_keys_record_by_queried_id() {
    let directory = Arc::new(FakeDirectory::default().with_user(
        "user_1",
        "ada@example.com",
        Some("Ada"),
        Some("Lovelace"),
    ));
    let mapping = mapping();
    let resolver = resolver(directory, &mapping);

    let record = resolver.resolve("user_1").await.unwrap();
    assert_eq!(record.id, "user_1");
    assert_eq!(record.email, "ada@example.com");
    assert_eq!(record.full_name.as_deref(), Some("Ada Lovelace"));
}

#[tokio::test]
async fn mapping_fallback_end_to_end() {
    // Literal scenario: forward mapping only, no directory record.
    let directory = Arc::new(FakeDirectory::default());
    let mapping = mapping();
    mapping.insert_pair("user_ABC", "a@example.com").await.unwrap();
    let resolver = resolver(directory, &mapping);

    let record = resolver.resolve("user_ABC").await.unwrap();
    assert_eq!(record.id, "user_ABC");
    assert_eq!(record.email, "a@example.com");
    assert!(record.first_name.is_none());
    assert!(record.last_name.is_none());
    assert!(record.full_name.is_none());

    assert_eq!(
        resolver.resolve_email("user_ABC").await.as_deref(),
        Some("a@example.com")
    );
    assert!(resolver.resolve("user_NONEXISTENT").await.is_none());
}

#[tokio::test]
async fn absent_everywhere_resolves_to_none_idempotently() {
    let directory = Arc::new(FakeDirectory::default());
    let mapping = mapping();
    let resolver = resolver(directory, &mapping);

    assert!(resolver.resolve("user_missing").await.is_none());
    assert!(resolver.resolve("user_missing").await.is_none());
}

#[tokio::test]
async fn resolution_is_idempotent_for_present_ids() {
    let directory = Arc::new(FakeDirectory::default().with_user(
        "user_1",
        "ada@example.com",
        None,
        None,
    ));
    let mapping = mapping();
    let resolver = resolver(directory, &mapping);

    let first = resolver.resolve("user_1").await;
    let second = resolver.resolve("user_1").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn directory_error_degrades_to_mapping() {
    let directory = Arc::new(FakeDirectory::default().with_user(
        "user_1",
        "ada@example.com",
        None,
        None,
    ));
    let mapping = mapping();
    mapping.insert_pair("user_1", "ada@example.com").await.unwrap();
    directory.set_unreachable(true);
    let resolver = resolver(directory.clone(), &mapping);

    // Directory down — resolution still answers from the side-mapping.
    let record = resolver.resolve("user_1").await.unwrap();
    assert_eq!(record.email, "ada@example.com");
    assert!(record.full_name.is_none());

    // Directory back up — the richer record wins again.
    directory.set_unreachable(false);
    let record = resolver.resolve("user_1").await.unwrap();
    assert_eq!(record.id, "user_1");
}

#[tokio::test]
async fn directory_error_without_mapping_is_none() {
    let directory = Arc::new(FakeDirectory::default());
    directory.set_unreachable(true);
    let mapping = mapping();
    let resolver = resolver(directory, &mapping);

    assert!(resolver.resolve("user_1").await.is_none());
}

#[tokio::test]
async fn display_name_projects_email_for_mapping_records() {
    let directory = Arc::new(FakeDirectory::default());
    let mapping = mapping();
    mapping.insert_pair("user_ABC", "a@example.com").await.unwrap();
    let resolver = resolver(directory, &mapping);

    assert_eq!(
        resolver.resolve_display_name("user_ABC").await.as_deref(),
        Some("a@example.com")
    );
}

#[tokio::test]
async fn batch_preserves_input_order() {
    let directory = Arc::new(
        FakeDirectory::default()
            .with_user("user_1", "one@example.com", None, None)
            .with_user("user_2", "two@example.com", None, None),
    );
    let mapping = mapping();
    mapping.insert_pair("user_legacy", "old@example.com").await.unwrap();
    let resolver = resolver(directory, &mapping);

    let ids: Vec<String> = ["user_2", "user_missing", "user_legacy", "user_1"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let records = resolver.resolve_batch(&ids).await;

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].as_ref().unwrap().email, "two@example.com");
    assert!(records[1].is_none());
    assert_eq!(records[2].as_ref().unwrap().email, "old@example.com");
    assert_eq!(records[3].as_ref().unwrap().email, "one@example.com");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Re-registration detection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn detect_records_directory_ids_for_mapped_email() {
    let directory = Arc::new(FakeDirectory::default().with_user(
        "user_new",
        "a@example.com",
        None,
        None,
    ));
    let mapping = mapping();
    mapping.insert_pair("user_old", "a@example.com").await.unwrap();

    let detector = ReRegistrationDetector::new(directory, mapping.clone(), 5);
    detector.detect("a@example.com").await;

    let record = mapping.reregistration("a@example.com").await.unwrap().unwrap();
    assert_eq!(record.production_user_ids, vec!["user_new".to_string()]);
}

#[tokio::test]
async fn detect_without_directory_account_records_nothing() {
    let directory = Arc::new(FakeDirectory::default());
    let mapping = mapping();
    mapping.insert_pair("user_old", "a@example.com").await.unwrap();

    let detector = ReRegistrationDetector::new(directory, mapping.clone(), 5);
    detector.detect("a@example.com").await;

    assert!(mapping.reregistration("a@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn detect_swallows_directory_failures() {
    let directory = Arc::new(FakeDirectory::default());
    directory.set_unreachable(true);
    let mapping = mapping();

    let detector = ReRegistrationDetector::new(directory, mapping.clone(), 5);
    // Must not panic or error — failures are logged and swallowed.
    detector.detect("a@example.com").await;

    assert!(mapping.reregistration("a@example.com").await.unwrap().is_none());
}
