use axum::Router;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use common_http_server_rs::{MonitoringState, metrics_endpoint, monitoring_info_endpoint};

/// Prometheus 指标与运行状态，不经过业务 state
pub(crate) fn router(monitoring: MonitoringState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/monitoring", get(monitoring_handler))
        .with_state(monitoring)
}

async fn metrics_handler(state: State<MonitoringState>) -> impl IntoResponse {
    metrics_endpoint(state).await
}

async fn monitoring_handler(state: State<MonitoringState>) -> impl IntoResponse {
    monitoring_info_endpoint(state).await
}
