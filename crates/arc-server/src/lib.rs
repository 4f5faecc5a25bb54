//! HTTP API surface for Arc (§4.3): axum routing, request validation,
//! error-to-status mapping, and pagination envelopes. Everything that
//! decides *what* happens lives in `arc-service`; this crate only
//! translates HTTP in and out.

pub mod actor;
mod blocking;
pub mod error;
pub mod pagination;
mod routes;
pub mod state;

use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::SharedState;

/// Builds the full router: every endpoint in §4.3, `TraceLayer` for
/// per-request logging, and a permissive `CorsLayer` (the core has no
/// origin allowlist of its own -- that belongs to an external reverse
/// proxy/collaborator per §1).
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::workspaces::router())
        .merge(routes::issues::router())
        .merge(routes::dependencies::router())
        .merge(routes::queries::router())
        .merge(routes::labels::router())
        .merge(routes::comments::router())
        .merge(routes::plans::router())
        .merge(routes::team_context::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Upper bound the server waits for in-flight requests to drain after a
/// shutdown signal (§5, §6: "~10 s").
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Resolves on SIGTERM (or Ctrl-C, for local/dev use) so `main` can pass it
/// to `axum::serve(..).with_graceful_shutdown(...)`.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, draining in-flight requests");
}
