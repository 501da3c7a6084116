//! The `DirectoryProvider` trait defines the interface to the primary
//! directory (REST in production, test doubles elsewhere).

use async_trait::async_trait;
use rv_domain::error::Result;

use crate::types::{CreateUserRequest, DirectoryUser};

/// Abstraction over the hosted directory API surface.
///
/// A lookup miss is `Ok(None)`; errors are transport or service failures
/// only.
#[async_trait]
pub trait DirectoryProvider: Send + Sync {
    /// Fetch a single user by opaque identifier (GET /v1/users/{id}).
    async fn fetch_user(&self, id: &str) -> Result<Option<DirectoryUser>>;

    /// List users matching an email address
    /// (GET /v1/users?email_address=…&limit=…).
    async fn list_users_by_email(&self, email: &str, limit: u32) -> Result<Vec<DirectoryUser>>;

    /// Create a user (POST /v1/users). Administrative import only.
    async fn create_user(&self, req: CreateUserRequest) -> Result<DirectoryUser>;
}
