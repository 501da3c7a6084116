use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;

use rv_domain::error::Error;

use crate::api::guard::AdminGuard;
use crate::state::AppState;

pub async fn check(
    State(state): State<AppState>,
    _guard: AdminGuard,
    Path(email): Path<String>,
) -> impl IntoResponse {
    match state.reconciler.check_for_migration(&email).await {
        Ok(check) => Json(check).into_response(),
        Err(e @ Error::Conflict(_)) => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct MigrateBody {
    pub old_id: String,
    pub new_id: String,
}

pub async fn migrate(
    State(state): State<AppState>,
    _guard: AdminGuard,
    Json(body): Json<MigrateBody>,
) -> impl IntoResponse {
    // Partial failure is data, not an HTTP error — the outcome carries the
    // per-table error list.
    let outcome = state.reconciler.migrate(&body.old_id, &body.new_id).await;
    Json(outcome)
}

pub async fn list_reregistrations(
    State(state): State<AppState>,
    _guard: AdminGuard,
) -> impl IntoResponse {
    match state.mapping.reregistrations().await {
        Ok(records) => Json(serde_json::json!({
            "count": records.len(),
            "records": records,
        }))
        .into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
