//! Data Transfer Objects for the directory API. The wire format is
//! snake_case JSON, so the derives need no renaming.

use rv_domain::user::UserRecord;
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// User records
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A user record as returned by the directory service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    pub primary_email_address_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailAddress {
    #[serde(default)]
    pub id: Option<String>,
    pub email_address: String,
}

impl DirectoryUser {
    /// The primary email address, falling back to the first one on record.
    pub fn primary_email(&self) -> Option<&str> {
        if let Some(primary_id) = &self.primary_email_address_id {
            if let Some(found) = self
                .email_addresses
                .iter()
                .find(|e| e.id.as_deref() == Some(primary_id.as_str()))
            {
                return Some(found.email_address.as_str());
            }
        }
        self.email_addresses
            .first()
            .map(|e| e.email_address.as_str())
    }

    /// Normalize into the caller-facing record, keyed by `queried_id`.
    ///
    /// Returns `None` when the directory record carries no email address —
    /// such a record cannot satisfy the resolution contract and the caller
    /// falls through to the next source.
    pub fn into_user_record(self, queried_id: &str) -> Option<UserRecord> {
        let email = self.primary_email()?.to_owned();
        let full_name = match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        };
        Some(UserRecord {
            id: queried_id.to_owned(),
            email,
            first_name: self.first_name,
            last_name: self.last_name,
            full_name,
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// User creation (administrative import)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// POST /v1/users — request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email_address: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Carries the legacy identifier so the new record stays linkable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    fn user(emails: &[(&str, &str)], primary: Option<&str>) -> DirectoryUser {
        DirectoryUser {
            id: "user_1".into(),
            email_addresses: emails
                .iter()
                .map(|(id, addr)| EmailAddress {
                    id: Some((*id).into()),
                    email_address: (*addr).into(),
                })
                .collect(),
            primary_email_address_id: primary.map(Into::into),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
        }
    }

    #[test]
    fn primary_email_honours_primary_id() {
        let u = user(
            &[("em_1", "old@example.com"), ("em_2", "new@example.com")],
            Some("em_2"),
        );
        assert_eq!(u.primary_email(), Some("new@example.com"));
    }

    #[test]
    fn primary_email_falls_back_to_first() {
        let u = user(
            &[("em_1", "first@example.com"), ("em_2", "second@example.com")],
            Some("em_missing"),
        );
        assert_eq!(u.primary_email(), Some("first@example.com"));
    }

    #[test]
    fn into_user_record_keys_by_queried_id() {
        let u = user(&[("em_1", "a@example.com")], None);
        let record = u.into_user_record("user_queried").unwrap();
        assert_eq!(record.id, "user_queried");
        assert_eq!(record.email, "a@example.com");
        assert_eq!(record.full_name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn record_without_email_normalizes_to_none() {
        let u = user(&[], None);
        assert!(u.into_user_record("user_1").is_none());
    }

    #[test]
    fn directory_user_parses_wire_json() {
        let json = r#"{
            "id": "user_2x9",
            "email_addresses": [
                { "id": "idn_1", "email_address": "dev@example.com" }
            ],
            "primary_email_address_id": "idn_1",
            "first_name": "Kai",
            "last_name": null,
            "unrelated_field": 42
        }"#;
        let u: DirectoryUser = serde_json::from_str(json).unwrap();
        assert_eq!(u.id, "user_2x9");
        assert_eq!(u.primary_email(), Some("dev@example.com"));
        assert!(u.last_name.is_none());
    }
}
