//! Kauri gateway binary.

use std::sync::Arc;

use anyhow::Context;
use kauri_kernel_seal::{keystore, Sealer};
use kauri_service::{create_router, AppState, ServiceConfig};
use kauri_storage::MemoryAuditStore;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let config = ServiceConfig::from_env();

    let (keypair, _provenance) = keystore::load_or_create(&config.signing_key_path())
        .context("signing keystore unavailable")?;
    let sealer = Arc::new(Sealer::new(keypair));

    let state = AppState::new(sealer, Arc::new(MemoryAuditStore::new()));
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("cannot bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "kauri gateway listening");

    axum::serve(listener, router).await?;
    Ok(())
}
