use axum::{response::IntoResponse, Json};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Task not found: {0}")]
    TaskNotFound(Uuid),
    #[error("Review not found: {0}")]
    ReviewNotFound(Uuid),
    #[error("No performance record for user: {0}")]
    PerformanceNotFound(Uuid),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        let status = match &self {
            Self::TaskNotFound(_) | Self::ReviewNotFound(_) | Self::PerformanceNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Connection(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
