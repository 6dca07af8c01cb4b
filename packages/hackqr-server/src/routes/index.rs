use axum::Json;
use axum::response::IntoResponse;

pub(crate) async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
