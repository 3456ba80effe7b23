// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `santalink serve` command implementation.
//!
//! Wires the configured token store into the HTTP gateway: initializes the
//! backend, starts the server, and closes the store on shutdown. The store
//! handle is constructed here and injected downward; domain code never
//! builds its own.

use std::sync::Arc;

use tracing::{info, warn};

use santalink_config::model::SantalinkConfig;
use santalink_core::{SantalinkError, TokenStore};
use santalink_gateway::{GatewayState, ServerConfig, start_server};
use santalink_storage::{MemoryTokenStore, SqliteTokenStore};

/// Run the server until ctrl-c.
pub async fn run(config: SantalinkConfig) -> Result<(), SantalinkError> {
    init_tracing(&config.server.log_level);

    let store = build_store(&config)?;
    store.initialize().await?;
    info!(backend = store.name(), "token store initialized");

    let state = GatewayState::new(store.clone());
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    tokio::select! {
        result = start_server(&server_config, state) => {
            // The server only returns on bind or serve failure.
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    if let Err(e) = store.close().await {
        warn!(error = %e, "store close failed during shutdown");
    }
    Ok(())
}

/// Construct the configured token store backend.
///
/// `validate_config` has already constrained `backend` to a known name;
/// the fallback error guards against drift between the two lists.
fn build_store(config: &SantalinkConfig) -> Result<Arc<dyn TokenStore>, SantalinkError> {
    match config.storage.backend.as_str() {
        "sqlite" => Ok(Arc::new(SqliteTokenStore::new(config.storage.clone()))),
        "memory" => Ok(Arc::new(MemoryTokenStore::new())),
        other => Err(SantalinkError::Config(format!(
            "unknown storage backend `{other}`"
        ))),
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("santalink={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
