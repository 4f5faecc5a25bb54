//! Storage error types.

use arc_core::error::ArcError;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("database not initialized: {reason}")]
    NotInitialized { reason: String },

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("unique constraint violated: {message}")]
    Conflict { message: String },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("migration {name} failed: {reason}")]
    Migration { name: String, reason: String },

    #[error("query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Transaction(_))
    }

    /// SQLite reports both unique-constraint violations and FK violations as
    /// `rusqlite::Error::SqliteFailure`; distinguish them by extended code.
    pub fn from_sqlite_insert(err: rusqlite::Error, conflict_message: impl Into<String>) -> Self {
        if is_unique_violation(&err) {
            Self::conflict(conflict_message)
        } else {
            Self::Query(err)
        }
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ErrorCode::ConstraintViolation,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        )
    )
}

/// Maps a storage-layer failure onto the coarser service-layer taxonomy.
/// Storage error messages never cross this boundary verbatim for the
/// `Internal` case (§7): the cause is preserved for logging only.
impl From<StorageError> for ArcError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => ArcError::NotFound {
                entity: entity_static(&entity),
                id,
            },
            StorageError::Validation { message } => ArcError::BadRequest(message),
            StorageError::Conflict { message } => ArcError::Conflict(message),
            other => ArcError::Internal(Some(Box::new(other))),
        }
    }
}

/// `ArcError::NotFound` wants a `&'static str` entity tag; storage errors
/// build theirs from owned strings, so pick the matching static.
fn entity_static(entity: &str) -> &'static str {
    match entity {
        "workspace" => "workspace",
        "issue" => "issue",
        "dependency" => "dependency",
        "label" => "label",
        "comment" => "comment",
        "plan" => "plan",
        _ => "entity",
    }
}
