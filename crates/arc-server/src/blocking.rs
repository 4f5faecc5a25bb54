//! Runs a synchronous service call on the blocking thread pool (§5): every
//! storage call is a potential blocking I/O point, and `rusqlite` is
//! synchronous, so handlers never call into `arc-service` directly on the
//! async executor.

use arc_core::error::ArcError;

use crate::error::ApiError;

/// Spawns `f` on `tokio`'s blocking pool and maps join failures to
/// `ArcError::Internal`. Dropping the returned future (client disconnect)
/// cancels the `JoinHandle`, propagating cancellation down to the
/// synchronous `rusqlite` call.
pub async fn run<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ArcError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => Err(ApiError(ArcError::internal(JoinError(e.to_string())))),
    }
}

#[derive(Debug, thiserror::Error)]
#[error("blocking task panicked: {0}")]
struct JoinError(String);
