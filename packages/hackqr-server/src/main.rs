mod app;
mod bootstrap;
mod db;
mod error;
mod routes;
mod services;
mod state;

use crate::state::AppState;
use clap::Parser;
use common_http_server_rs::{MonitoringState, Server, setup_metrics_recorder};
use dotenvy::dotenv;
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser)]
struct CliArgs {
    /// 只启动 axum 路由，不挂防护与监控中间件
    #[clap(long)]
    bare: bool,
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    dotenv().ok();

    let rt = tokio::runtime::Runtime::new()?;
    match args.bare {
        true => rt.block_on(bare_service())?,
        false => rt.block_on(hackqr_service())?,
    }

    Ok(())
}

async fn connect_database() -> anyhow::Result<DatabaseConnection> {
    let db_url = bootstrap::config::database_url_from_env();
    let db_cnn = Database::connect(&db_url).await?;
    db::initialize::initial(&db_cnn).await?;
    Ok(db_cnn)
}

async fn hackqr_service() -> anyhow::Result<()> {
    let db_cnn = connect_database().await?;

    let monitoring = MonitoringState::new();
    setup_metrics_recorder(monitoring.clone());
    let state = Arc::new(AppState::new(db_cnn, monitoring));

    let app_config = bootstrap::config::app_config_from_env();
    let app_builder = bootstrap::app::app_builder(state, app_config)?;
    let server_config = bootstrap::config::server_config_from_env()?;
    let server = Server::new(server_config, app_builder);

    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("failed to start server: {e}"))?;
    Ok(())
}

async fn bare_service() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_cnn = connect_database().await?;
    let state = Arc::new(AppState::new(db_cnn, MonitoringState::new()));

    let addr = bootstrap::config::listen_addr_from_env()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "hackqr server listening");
    axum::serve(listener, app::axum_app(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_default() {
        let args = CliArgs::try_parse_from(["hackqr-server"]).unwrap();
        assert!(!args.bare);
    }

    #[test]
    fn test_cli_args_bare() {
        let args = CliArgs::try_parse_from(["hackqr-server", "--bare"]).unwrap();
        assert!(args.bare);
    }

    #[tokio::test]
    async fn test_database_connection() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        assert!(db.ping().await.is_ok());
        db::initialize::initial(&db).await.unwrap();
    }
}
