use crate::error::AppError;
use crate::services::qr::analytics;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use hackqr_core::{AnalyticsQuery, ApiResponse};
use std::sync::Arc;

pub(crate) fn router() -> Router<Arc<AppState>> {
    Router::new().route("/scan-analytics", get(scan_analytics_handler))
}

async fn scan_analytics_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let stats = analytics::analytics(&state.db, query.hackathon_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(stats))))
}
