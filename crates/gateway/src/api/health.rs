use axum::response::{IntoResponse, Json};

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "redverse-identity",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
