//! Bearer-token guards — Axum extractors for the two auth tiers.
//!
//! Handlers opt in by adding `_guard: ApiGuard` (or `AdminGuard`) to their
//! parameter list. Uses SHA-256 + constant-time comparison to prevent
//! timing side-channel attacks.
//!
//! If the matching token env var is not configured (dev mode), all
//! requests pass.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::Json;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::state::AppState;

/// Enforces the service bearer token on resolution endpoints.
pub struct ApiGuard;

/// Enforces the admin bearer token on migration endpoints.
pub struct AdminGuard;

type GuardRejection = (StatusCode, Json<serde_json::Value>);

fn check(parts: &Parts, expected_hash: &Option<Vec<u8>>) -> Result<(), GuardRejection> {
    let Some(expected) = expected_hash else {
        return Ok(()); // no token configured → dev mode, allow all
    };

    let provided = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("");

    // Hash the provided token to a fixed-length digest, then compare in
    // constant time. This avoids leaking the token length.
    let provided_hash = Sha256::digest(provided.as_bytes());

    if !bool::from(provided_hash.ct_eq(expected.as_slice())) {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "invalid bearer token" })),
        ));
    }
    Ok(())
}

#[async_trait]
impl FromRequestParts<AppState> for ApiGuard {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        check(parts, &state.api_token_hash).map(|_| ApiGuard)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        check(parts, &state.admin_token_hash).map(|_| AdminGuard)
    }
}
