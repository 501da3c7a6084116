//! Key formats for the side-mapping store.
//!
//! These are the exact ASCII keys written by the original bulk migration.
//! They are a wire format shared with data already in production — do not
//! change them.

/// Forward entry: legacy identifier → email.
pub const FORWARD_PREFIX: &str = "test_user_email:";
/// Reverse entry: email → legacy identifier.
pub const REVERSE_PREFIX: &str = "email_to_test_user:";
/// Re-registration record, keyed by email.
pub const REREGISTRATION_PREFIX: &str = "reregistered_user:";
/// Singleton metadata written by the seeding script.
pub const MIGRATION_INFO_KEY: &str = "user_migration_info";

pub fn forward_key(legacy_id: &str) -> String {
    format!("{FORWARD_PREFIX}{legacy_id}")
}

pub fn reverse_key(email: &str) -> String {
    format!("{REVERSE_PREFIX}{email}")
}

pub fn reregistration_key(email: &str) -> String {
    format!("{REREGISTRATION_PREFIX}{email}")
}

pub fn legacy_id_from_forward_key(key: &str) -> Option<&str> {
    key.strip_prefix(FORWARD_PREFIX)
}

pub fn email_from_reregistration_key(key: &str) -> Option<&str> {
    key.strip_prefix(REREGISTRATION_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_key_format() {
        assert_eq!(forward_key("user_ABC"), "test_user_email:user_ABC");
    }

    #[test]
    fn reverse_key_format() {
        assert_eq!(
            reverse_key("a@example.com"),
            "email_to_test_user:a@example.com"
        );
    }

    #[test]
    fn reregistration_key_format() {
        assert_eq!(
            reregistration_key("a@example.com"),
            "reregistered_user:a@example.com"
        );
    }

    #[test]
    fn forward_key_roundtrip() {
        let key = forward_key("user_ABC");
        assert_eq!(legacy_id_from_forward_key(&key), Some("user_ABC"));
        assert_eq!(legacy_id_from_forward_key("other:user_ABC"), None);
    }

    #[test]
    fn reregistration_key_roundtrip() {
        let key = reregistration_key("a@example.com");
        assert_eq!(email_from_reregistration_key(&key), Some("a@example.com"));
    }
}
