//! Maps [`ArcError`] to HTTP responses (§7): a single `IntoResponse` impl,
//! body always `{"error": "<message>"}`, real causes logged rather than
//! returned.

use arc_core::error::ArcError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub struct ApiError(pub ArcError);

impl From<ArcError> for ApiError {
    fn from(err: ArcError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ArcError::Internal(_) = &self.0 {
            tracing::error!(error = ?self.0, "internal error");
        }

        let status = match &self.0 {
            ArcError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ArcError::Unauthorized => StatusCode::UNAUTHORIZED,
            ArcError::Forbidden => StatusCode::FORBIDDEN,
            ArcError::NotFound { .. } => StatusCode::NOT_FOUND,
            ArcError::Conflict(_) => StatusCode::CONFLICT,
            ArcError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
