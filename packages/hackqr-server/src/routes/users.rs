use crate::error::AppError;
use crate::services::directory;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use hackqr_core::{ApiResponse, RegisterUserRequest, UserItem, VerificationUpdate};
use std::sync::Arc;

pub(crate) fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(register_user_handler))
        .route("/{id}", get(get_user_handler))
        .route("/{id}/verification", patch(set_verification_handler))
}

async fn register_user_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = directory::register_user(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(UserItem::from(user)))))
}

async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = directory::find_user(&state.db, id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(UserItem::from(user)))))
}

async fn set_verification_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(update): Json<VerificationUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let user = directory::set_verification(&state.db, id, update.status.into()).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(UserItem::from(user)))))
}
