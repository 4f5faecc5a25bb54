//! Collision-retried id allocation (§4.2, §4.2.1). Hierarchical child
//! numbers come from the atomic `child_counters` upsert in storage and never
//! collide by construction; only the hash-derived top-level shapes
//! (workspace, issue, plan ids) need a retry loop.

use chrono::Utc;

use arc_core::error::ArcError;
use arc_core::idgen::{generate_issue_id, generate_plan_id, generate_workspace_id};
use arc_storage::Storage;

/// Bound on nonce-bumped retries (§4.2.1). Collision probability at 5-6
/// base36 chars is negligible; this exists for correctness, not because
/// it is expected to be hit.
const MAX_ID_ATTEMPTS: u32 = 8;

#[derive(Debug, thiserror::Error)]
#[error("could not allocate a unique {kind} id after {attempts} attempts")]
struct IdSpaceExhausted {
    kind: &'static str,
    attempts: u32,
}

pub(crate) fn allocate_workspace_id(store: &dyn Storage, name: &str) -> Result<String, ArcError> {
    let now = Utc::now();
    for nonce in 0..MAX_ID_ATTEMPTS {
        let id = generate_workspace_id(name, now, nonce);
        match store.get_workspace(&id) {
            Err(e) if e.is_not_found() => return Ok(id),
            Err(e) => return Err(e.into()),
            Ok(_) => continue,
        }
    }
    Err(ArcError::internal(IdSpaceExhausted { kind: "workspace", attempts: MAX_ID_ATTEMPTS }))
}

pub(crate) fn allocate_issue_id(store: &dyn Storage, prefix: &str, title: &str) -> Result<String, ArcError> {
    let now = Utc::now();
    for nonce in 0..MAX_ID_ATTEMPTS {
        let id = generate_issue_id(prefix, title, now, nonce);
        match store.get_issue(&id) {
            Err(e) if e.is_not_found() => return Ok(id),
            Err(e) => return Err(e.into()),
            Ok(_) => continue,
        }
    }
    Err(ArcError::internal(IdSpaceExhausted { kind: "issue", attempts: MAX_ID_ATTEMPTS }))
}

pub(crate) fn allocate_plan_id(store: &dyn Storage, title: &str) -> Result<String, ArcError> {
    let now = Utc::now();
    for nonce in 0..MAX_ID_ATTEMPTS {
        let id = generate_plan_id(title, now, nonce);
        match store.get_plan(&id) {
            Err(e) if e.is_not_found() => return Ok(id),
            Err(e) => return Err(e.into()),
            Ok(_) => continue,
        }
    }
    Err(ArcError::internal(IdSpaceExhausted { kind: "plan", attempts: MAX_ID_ATTEMPTS }))
}
