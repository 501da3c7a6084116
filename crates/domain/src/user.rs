//! The normalized user record returned by the resolution chain.

use serde::{Deserialize, Serialize};

/// A user as seen by the rest of the application, regardless of which
/// source resolved it.
///
/// `id` always equals the identifier the caller queried by — or the legacy
/// identifier when the record came out of the side-mapping. `email` is
/// present on every record; the name fields are only known when the primary
/// directory supplied them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl UserRecord {
    /// A record synthesized from a side-mapping entry: identifier and email
    /// only, names unknown.
    pub fn from_mapping(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            first_name: None,
            last_name: None,
            full_name: None,
        }
    }

    /// Best display name available: full name, else first/last, else the
    /// email address.
    pub fn display_name(&self) -> String {
        if let Some(full) = &self.full_name {
            if !full.trim().is_empty() {
                return full.clone();
            }
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }
}
