use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use remindmark_db::StoreError;
use remindmark_scheduler::DeliveryError;
use remindmark_types::api::ErrorResponse;

/// Errors returned by command handlers, rendered as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("missing or invalid token")]
    Unauthorized,

    #[error("No bookmark found with ID #{0}")]
    NotFound(i64),

    #[error("You reached the maximum of {0} bookmarks. Please remove bookmarks before adding new ones.")]
    LimitReached(usize),

    #[error("Failed to deliver message: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("{0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(msg) => Self::BadRequest(msg),
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::LimitReached { max, .. } => Self::LimitReached(max),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::LimitReached(_) => StatusCode::CONFLICT,
            Self::Delivery(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(msg) => {
                error!("Request failed: {}", msg);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "internal error".into(),
                    }),
                )
                    .into_response();
            }
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
