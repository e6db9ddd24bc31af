//! Public API types

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::error::SessionError;

// Errors

pub struct ApiError(anyhow::Error);

/// Convert `ApiError` into an Axum compatible response. Session
/// errors carry their own HTTP status; anything else is a 500.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Always log the error
        tracing::error!("{}", self.0);

        let status = match self.0.downcast_ref::<SessionError>() {
            Some(SessionError::EmptyMessage) | Some(SessionError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            Some(SessionError::EmailInUse(_)) => StatusCode::CONFLICT,
            Some(SessionError::Auth(_)) => StatusCode::UNAUTHORIZED,
            Some(SessionError::Completion(_)) => StatusCode::BAD_GATEWAY,
            Some(SessionError::Persistence(_)) | None => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            axum::Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod auth {
    pub use crate::api::routes::auth::public::*;
}

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}
