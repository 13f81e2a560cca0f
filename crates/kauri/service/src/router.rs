//! API router configuration.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the gateway router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Gate battery
        .route("/actions", post(handlers::submit_action))
        // Consent anchors
        .route("/consent/anchors", post(handlers::derive_anchor))
        .route("/consent/validate", post(handlers::validate_anchor))
        // Provenance chain
        .route("/provenance/chain", get(handlers::chain_status))
        .route("/provenance/verify", get(handlers::chain_verify))
        // Audit listings
        .route("/audit/actions", get(handlers::list_action_audits))
        .route("/audit/anchors", get(handlers::list_anchor_audits));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kauri_crypto::Keypair;
    use kauri_kernel_seal::Sealer;
    use kauri_storage::MemoryAuditStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn router_builds_with_state() {
        let sealer = Arc::new(Sealer::new(Arc::new(Keypair::from_seed(&[8u8; 32]))));
        let state = AppState::new(sealer, Arc::new(MemoryAuditStore::new()));
        let _router = create_router(state);
    }
}
