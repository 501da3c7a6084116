pub mod guard;
pub mod health;
pub mod identity;
pub mod migration;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the full API router.
///
/// `/health` is public. Resolution endpoints require the service bearer
/// token; migration endpoints require the admin token (see [`guard`]).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        // Resolution
        .route("/v1/identity/resolve", post(identity::resolve_batch))
        .route("/v1/identity/sign-in", post(identity::sign_in))
        .route("/v1/identity/:id", get(identity::resolve))
        .route("/v1/identity/:id/email", get(identity::resolve_email))
        // Migration (admin)
        .route("/v1/migration/check/:email", get(migration::check))
        .route("/v1/migration/migrate", post(migration::migrate))
        .route("/v1/reregistrations", get(migration::list_reregistrations))
}
