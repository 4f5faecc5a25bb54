//! `GET /health` (§4.3, §6): liveness probe, no workspace scoping.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime: u64,
    port: u16,
    webui_url: Option<String>,
}

pub fn router() -> Router<SharedState> {
    Router::new().route("/health", get(health))
}

/// `webui_url` is always `null`: the embedded browser UI is an external
/// collaborator (§1), not part of this core.
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.start_time.elapsed().as_secs(),
        port: state.port,
        webui_url: None,
    })
}
