use crate::error::AppError;
use crate::services::qr::{issuer, validator};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use hackqr_core::{ApiResponse, IssueTokenRequest, ScanLogItem, TokenItem};
use std::sync::Arc;

pub(crate) fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate", post(generate_handler))
        .route("/tokens/{token}", get(get_token_handler))
        .route("/tokens/{token}/scans", get(scan_history_handler))
}

async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IssueTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token = issuer::issue_token(&state.db, state.token_generator.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(TokenItem::from(token)))))
}

async fn get_token_handler(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let token = validator::get_token(&state.db, &token).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(TokenItem::from(token)))))
}

async fn scan_history_handler(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let logs = validator::scan_history(&state.db, &token).await?;
    let items: Vec<ScanLogItem> = logs.into_iter().map(ScanLogItem::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(items))))
}
