use crate::routes;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// 不带防护栈的精简路由，`--bare` 模式与路由测试共用
pub(crate) fn axum_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::index::health))
        .nest("/users", routes::users::router())
        .nest("/qr", routes::qr::router())
        .nest("/scan", routes::scan::router())
        .nest("/admin", routes::admin::router())
        .with_state(Arc::clone(&state))
        .nest("/monitor", routes::monitor::router(state.monitoring.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
}
