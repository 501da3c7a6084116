use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;

use rv_domain::error::Error;

use crate::api::guard::ApiGuard;
use crate::state::AppState;

pub async fn resolve(
    State(state): State<AppState>,
    _guard: ApiGuard,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.resolver.resolve(&id).await {
        Some(record) => Json(record).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "user not found" })),
        )
            .into_response(),
    }
}

pub async fn resolve_email(
    State(state): State<AppState>,
    _guard: ApiGuard,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.resolver.resolve_email(&id).await {
        Some(email) => Json(serde_json::json!({ "id": id, "email": email })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "user not found" })),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct ResolveBatchBody {
    pub ids: Vec<String>,
}

pub async fn resolve_batch(
    State(state): State<AppState>,
    _guard: ApiGuard,
    Json(body): Json<ResolveBatchBody>,
) -> impl IntoResponse {
    let records = state.resolver.resolve_batch(&body.ids).await;
    Json(serde_json::json!({
        "count": records.len(),
        "records": records,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SignInBody {
    pub user_id: String,
    pub email: String,
}

pub async fn sign_in(
    State(state): State<AppState>,
    _guard: ApiGuard,
    Json(body): Json<SignInBody>,
) -> impl IntoResponse {
    match state
        .reconciler
        .handle_sign_in(&body.user_id, &body.email)
        .await
    {
        Ok(outcome) => Json(outcome).into_response(),
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
