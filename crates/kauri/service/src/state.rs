use std::sync::Arc;

use chrono::{DateTime, Utc};
use kauri_kernel_gates::GateOrchestrator;
use kauri_kernel_seal::Sealer;
use kauri_storage::GateAuditStore;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<GateOrchestrator>,
    pub sealer: Arc<Sealer>,
    pub store: Arc<dyn GateAuditStore>,
    pub started_at: DateTime<Utc>,
    pub version: String,
}

impl AppState {
    pub fn new(sealer: Arc<Sealer>, store: Arc<dyn GateAuditStore>) -> Self {
        Self {
            orchestrator: Arc::new(GateOrchestrator::new()),
            sealer,
            store,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn uptime(&self) -> String {
        let elapsed = Utc::now() - self.started_at;
        format!("{}s", elapsed.num_seconds().max(0))
    }
}
