use crate::error::AppError;
use crate::services::qr::validator;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use hackqr_core::{ApiResponse, ScanRequest};
use std::sync::Arc;

pub(crate) fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(scan_handler))
}

/// 被拒绝的扫码同样是 200，由 `success` 字段区分
async fn scan_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScanRequest>,
) -> Result<impl IntoResponse, AppError> {
    let result = validator::scan(
        &state.db,
        &state.scan_gate,
        &request.token,
        request.scanner_id,
    )
    .await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(result))))
}
