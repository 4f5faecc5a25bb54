//! Arc server entry point: loads configuration, opens the storage handle,
//! and serves the HTTP API until a graceful-shutdown signal arrives (§5,
//! §6).

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use arc_config::Config;
use arc_server::state::AppState;
use arc_service::Service;
use arc_storage::SqliteStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config_path = std::env::var("ARC_CONFIG").unwrap_or_else(|_| "arc.toml".to_string());
    let config = Config::load(&config_path).context("failed to load configuration")?;

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create database directory {}", parent.display()))?;
    }

    let store = SqliteStore::open(&config.db_path)
        .with_context(|| format!("failed to open database at {}", config.db_path.display()))?;
    tracing::info!(db_path = %config.db_path.display(), "storage opened, migrations applied");

    let listener = tokio::net::TcpListener::bind(&config.address)
        .await
        .with_context(|| format!("failed to bind {}", config.address))?;
    let port = listener.local_addr()?.port();

    let state = Arc::new(AppState {
        service: Service::new(Arc::new(store)),
        start_time: Instant::now(),
        port,
    });

    let router = arc_server::build_router(state);

    tracing::info!(address = %config.address, port, "arc listening");

    // `with_graceful_shutdown` waits unboundedly for in-flight requests to
    // drain once this future resolves, so the ~10s cap from §6 is enforced
    // by a watchdog that force-exits if the drain overruns it.
    let shutdown = async {
        arc_server::shutdown_signal().await;
        tokio::spawn(async {
            tokio::time::sleep(arc_server::SHUTDOWN_GRACE_PERIOD).await;
            tracing::warn!("graceful shutdown exceeded grace period, forcing exit");
            std::process::exit(1);
        });
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")?;

    tracing::info!("shutdown complete");
    Ok(())
}
