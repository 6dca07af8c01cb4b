use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use hackqr_core::ErrorBody;
use sea_orm::DbErr;
use thiserror::Error;
use tracing::{error, warn};

/// 请求级别的硬失败。被拒绝的扫码不在此列，它以 success=false 正常返回
#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let message = match self {
            AppError::Db(err) => {
                error!(error = %err, "database error");
                "database error".to_string()
            }
            AppError::NotFound(msg) => {
                warn!(error = %msg, "resource not found");
                msg
            }
            AppError::PermissionDenied(msg) => {
                warn!(error = %msg, "permission denied");
                msg
            }
            AppError::Conflict(msg) => {
                warn!(error = %msg, "conflict");
                msg
            }
            AppError::Validation(msg) => {
                warn!(error = %msg, "validation error");
                msg
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
