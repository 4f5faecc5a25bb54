//! The core error taxonomy shared by the storage, service, and API crates.
//!
//! Constructors, an `is_not_found()` predicate, and `#[from]` conversions,
//! carrying the coarser vocabulary the API surface maps directly to HTTP
//! status codes.

use thiserror::Error;

/// A domain-level failure, one notch above raw storage errors.
#[derive(Debug, Error)]
pub enum ArcError {
    /// Syntactic/semantic input error: missing field, self-dependency, empty
    /// plan text, invalid enum value, zero-field partial update, ...
    #[error("{0}")]
    BadRequest(String),

    /// Reserved for a future authentication layer; the core never returns
    /// this today (actor identity is advisory only, per §9).
    #[error("unauthorized")]
    Unauthorized,

    /// The caller named a workspace that does not own the resource being
    /// accessed.
    #[error("access denied")]
    Forbidden,

    /// The named entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A uniqueness constraint was violated (duplicate workspace name, ...).
    #[error("{0}")]
    Conflict(String),

    /// Storage failure, serialization failure, or anything else that is not
    /// the caller's fault. The message shown to clients is always the fixed
    /// string `"internal error"`; the real cause is logged, never returned.
    #[error("internal error")]
    Internal(#[source] Option<Box<dyn std::error::Error + Send + Sync>>),
}

pub type Result<T> = std::result::Result<T, ArcError>;

impl ArcError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal(Some(Box::new(source)))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden)
    }
}
