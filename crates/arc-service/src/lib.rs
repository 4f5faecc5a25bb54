//! Business-logic layer (§4.2): ID allocation, workspace authorization,
//! ready/blocked orchestration, plan resolution, audit emission, and the
//! team-context view. Storage stays mechanical; every policy decision lives
//! here.
//!
//! Unlike [`arc_storage`]'s per-entity modules (which split storage
//! operations into free functions plus thin `impl SqliteStore` blocks), the
//! service layer is a single [`Service`] handle with its methods spread
//! across the sibling modules as `impl Service` blocks -- there is no
//! teacher analog for this layer, so it is built fresh in that same
//! split-by-entity shape.

mod comments;
mod dependencies;
mod ids;
mod issues;
mod labels;
mod plans;
mod queries;
mod team_context;
mod workspaces;

use std::sync::Arc;

use arc_storage::Storage;

/// Façade over the storage engine. Cloning is cheap: it only clones the
/// `Arc` around the shared storage handle.
#[derive(Clone)]
pub struct Service {
    pub(crate) store: Arc<dyn Storage>,
}

impl Service {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }
}
