use std::sync::Arc;

use rv_directory::provider::DirectoryProvider;
use rv_domain::trace::{ResolvedVia, TraceEvent};
use rv_domain::user::UserRecord;
use rv_mapping::store::SideMapping;
use tracing::warn;

use crate::detector::ReRegistrationDetector;

/// Resolves user identifiers through the directory-then-mapping fallback
/// chain.
///
/// Every failure inside the chain degrades to the next source; callers only
/// ever see a record or `None`. Lookups are idempotent reads, so concurrent
/// resolutions for the same identifier are simply allowed to race.
#[derive(Clone)]
pub struct IdentityResolver {
    directory: Arc<dyn DirectoryProvider>,
    mapping: SideMapping,
    detector: Option<ReRegistrationDetector>,
}

impl IdentityResolver {
    pub fn new(directory: Arc<dyn DirectoryProvider>, mapping: SideMapping) -> Self {
        Self {
            directory,
            mapping,
            detector: None,
        }
    }

    /// Enable opportunistic re-registration detection for directory hits
    /// whose email is mapped to a different legacy identifier.
    pub fn with_detector(mut self, detector: ReRegistrationDetector) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Resolve an identifier to a normalized user record.
    ///
    /// 1. Primary directory by identifier.
    /// 2. On a hit, cross-check the side-mapping (observability only).
    /// 3. On a miss or transport error, the side-mapping forward key.
    /// 4. `None` when neither source has a live entry.
    pub async fn resolve(&self, id: &str) -> Option<UserRecord> {
        match self.directory.fetch_user(id).await {
            Ok(Some(user)) => {
                if let Some(record) = user.into_user_record(id) {
                    self.cross_check(&record).await;
                    TraceEvent::IdentityResolved {
                        user_id: id.to_owned(),
                        via: ResolvedVia::Directory,
                    }
                    .emit();
                    return Some(record);
                }
                warn!(user_id = %id, "directory record has no email address, falling back");
            }
            Ok(None) => {}
            Err(e) => {
                warn!(user_id = %id, error = %e, "directory lookup failed, falling back to side-mapping");
            }
        }

        match self.mapping.email_for_legacy_id(id).await {
            Ok(Some(email)) => {
                TraceEvent::IdentityResolved {
                    user_id: id.to_owned(),
                    via: ResolvedVia::Mapping,
                }
                .emit();
                Some(UserRecord::from_mapping(id, email))
            }
            Ok(None) => None,
            Err(e) => {
                warn!(user_id = %id, error = %e, "side-mapping lookup failed");
                None
            }
        }
    }

    /// The resolved email address, if any.
    pub async fn resolve_email(&self, id: &str) -> Option<String> {
        self.resolve(id).await.map(|r| r.email)
    }

    /// The best display name, falling back to the email address.
    pub async fn resolve_display_name(&self, id: &str) -> Option<String> {
        self.resolve(id).await.map(|r| r.display_name())
    }

    /// Resolve many identifiers; results come back in input order. Each
    /// resolution is independent.
    pub async fn resolve_batch(&self, ids: &[String]) -> Vec<Option<UserRecord>> {
        futures_util::future::join_all(ids.iter().map(|id| self.resolve(id))).await
    }

    /// Compare a directory record against the reverse mapping for its
    /// email. Observability only — the returned record is never altered.
    /// A mismatch triggers background re-registration detection.
    async fn cross_check(&self, record: &UserRecord) {
        let mapped = match self.mapping.legacy_id_for_email(&record.email).await {
            Ok(mapped) => mapped,
            Err(e) => {
                warn!(user_id = %record.id, error = %e, "cross-check against side-mapping failed");
                return;
            }
        };
        let Some(legacy_id) = mapped else { return };

        let consistent = legacy_id == record.id;
        TraceEvent::MappingCrossCheck {
            user_id: record.id.clone(),
            consistent,
        }
        .emit();

        if !consistent {
            if let Some(detector) = &self.detector {
                detector.spawn_detect(record.email.clone());
            }
        }
    }
}
