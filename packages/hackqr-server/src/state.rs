use crate::services::qr::gate::ScanGate;
use crate::services::qr::issuer::{RandomTokenGenerator, TokenGenerator};
use common_http_server_rs::MonitoringState;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub(crate) struct AppState {
    pub(crate) db: DatabaseConnection,
    pub(crate) monitoring: MonitoringState,
    pub(crate) scan_gate: ScanGate,
    pub(crate) token_generator: Arc<dyn TokenGenerator>,
}

impl AppState {
    pub(crate) fn new(db: DatabaseConnection, monitoring: MonitoringState) -> Self {
        Self {
            db,
            monitoring,
            scan_gate: ScanGate::new(),
            token_generator: Arc::new(RandomTokenGenerator),
        }
    }
}
