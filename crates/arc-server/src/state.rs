//! Shared application state (§5): the service handle, process start time
//! for uptime reporting, and the bound port reported by `/health`.

use std::sync::Arc;
use std::time::Instant;

use arc_service::Service;

pub struct AppState {
    pub service: Service,
    pub start_time: Instant,
    pub port: u16,
}

pub type SharedState = Arc<AppState>;
