use std::sync::Arc;

use chrono::Utc;
use rv_directory::provider::DirectoryProvider;
use rv_domain::trace::TraceEvent;
use rv_mapping::store::SideMapping;
use rv_mapping::types::ReRegistrationRecord;
use tracing::{debug, warn};

/// Detects users who opened a fresh directory account while still holding a
/// legacy side-mapping entry under a different identifier.
///
/// Fire-and-forget: detection runs on a spawned task, failures are logged
/// and swallowed, and the caller's resolution is never blocked.
#[derive(Clone)]
pub struct ReRegistrationDetector {
    directory: Arc<dyn DirectoryProvider>,
    mapping: SideMapping,
    email_page_size: u32,
}

impl ReRegistrationDetector {
    pub fn new(
        directory: Arc<dyn DirectoryProvider>,
        mapping: SideMapping,
        email_page_size: u32,
    ) -> Self {
        Self {
            directory,
            mapping,
            email_page_size,
        }
    }

    /// Run detection on a background task.
    pub fn spawn_detect(&self, email: String) {
        let detector = self.clone();
        tokio::spawn(async move {
            detector.detect(&email).await;
        });
    }

    /// Query the directory for accounts under `email` and persist a
    /// re-registration record when any exist.
    pub async fn detect(&self, email: &str) {
        let users = match self
            .directory
            .list_users_by_email(email, self.email_page_size)
            .await
        {
            Ok(users) => users,
            Err(e) => {
                warn!(email = %email, error = %e, "re-registration lookup failed");
                return;
            }
        };

        if users.is_empty() {
            debug!(email = %email, "no directory account for email, nothing to record");
            return;
        }

        let record = ReRegistrationRecord {
            email: email.to_owned(),
            production_user_ids: users.into_iter().map(|u| u.id).collect(),
            detected_at: Utc::now(),
        };

        match self.mapping.record_reregistration(&record).await {
            Ok(()) => TraceEvent::ReRegistrationRecorded {
                email: record.email.clone(),
                directory_ids: record.production_user_ids.len(),
            }
            .emit(),
            Err(e) => {
                warn!(email = %email, error = %e, "failed to persist re-registration record");
            }
        }
    }
}
