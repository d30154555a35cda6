use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::WatchingStatus;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown watching status: {0}")]
    UnknownStatus(String),

    #[error("Reviews are only allowed once the series is finished (current status: {0})")]
    ReviewNotAllowed(WatchingStatus),

    #[error("A review for this series already exists")]
    ReviewAlreadyExists,

    #[error("Concurrent update conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the error is a recoverable business-rule violation rather than
    /// an infrastructure failure
    pub fn is_domain_rule(&self) -> bool {
        matches!(
            self,
            AppError::ReviewNotAllowed(_) | AppError::ReviewAlreadyExists
        )
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::ReviewNotAllowed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ReviewAlreadyExists | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::UnknownStatus(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
