use serde::Serialize;

/// Structured trace events emitted across the identity crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    DirectoryCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    DatastoreCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    IdentityResolved {
        user_id: String,
        via: ResolvedVia,
    },
    MappingCrossCheck {
        user_id: String,
        consistent: bool,
    },
    ReRegistrationRecorded {
        email: String,
        directory_ids: usize,
    },
    MigrationChecked {
        email: String,
        has_data: bool,
    },
    MigrationApplied {
        old_id: String,
        new_id: String,
        tables_migrated: usize,
        tables_failed: usize,
    },
}

/// Which source produced a resolved record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedVia {
    Directory,
    Mapping,
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "rv_event");
    }
}
