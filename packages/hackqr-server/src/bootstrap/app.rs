use crate::routes;
use crate::state::AppState;
use anyhow::Result;
use axum::routing::get;
use common_http_server_rs::{
    AppBuilder, AppConfig, GlobalMonitoringConfig, MiddlewareOrchestrator,
    PerformanceMonitoringConfig, ProtectionStackBuilder, ddos_presets, rate_limit_presets,
    size_limit_presets,
};
use std::sync::Arc;

/// 完整服务栈：DDoS/限流/请求体大小防护 + 指标采集
pub(crate) fn app_builder(state: Arc<AppState>, app_config: AppConfig) -> Result<AppBuilder> {
    let ddos_config = ddos_presets::lenient();
    let rate_limit_config = rate_limit_presets::lenient();
    let size_limit_config = size_limit_presets::api();

    let protection_stack = ProtectionStackBuilder::new()
        .with_ddos(ddos_config.clone())
        .with_rate_limit(rate_limit_config.clone())
        .with_size_limit_content_length_only(size_limit_config.clone())
        .build()?;

    let orchestrator = MiddlewareOrchestrator::new()
        .with_app_runtime_layers(true)
        .with_monitoring_config(
            state.monitoring.clone(),
            GlobalMonitoringConfig::new().with_performance_config(
                PerformanceMonitoringConfig::new()
                    .exclude_request_count_path_prefix("/monitor")
                    .exclude_request_count_path_prefix("/health"),
            ),
        )
        .with_protection_stack(protection_stack);

    Ok(AppBuilder::new(app_config)
        .validate_ddos_config(ddos_config)
        .validate_rate_limit_config(rate_limit_config)
        .validate_size_limit_config(size_limit_config)
        .route("/health", get(routes::index::health))
        .nest(
            "/users",
            routes::users::router().with_state(Arc::clone(&state)),
        )
        .nest("/qr", routes::qr::router().with_state(Arc::clone(&state)))
        .nest("/scan", routes::scan::router().with_state(Arc::clone(&state)))
        .nest(
            "/admin",
            routes::admin::router().with_state(Arc::clone(&state)),
        )
        .nest("/monitor", routes::monitor::router(state.monitoring.clone()))
        .with_orchestrator(orchestrator))
}
