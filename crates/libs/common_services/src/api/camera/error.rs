use crate::api::error_response;
use crate::database::DbError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("internal error")]
    Internal(#[from] eyre::Report),

    #[error("Camera not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid request: {0}")]
    InvalidInput(String),

    #[error("No completed recordings for camera {0}")]
    NoCompletedRecording(Uuid),

    #[error("Share link not found or expired")]
    ShareNotFound,
}

fn log_error(error: &CameraError) {
    match error {
        CameraError::Database(e) => error!("Camera -> Database query failed: {e}"),
        CameraError::Internal(e) => error!("Camera -> Internal error: {e:?}"),
        CameraError::NotFound(id) => warn!("Camera -> Not found: {id}"),
        CameraError::InvalidInput(message) => warn!("Camera -> Invalid input: {message}"),
        CameraError::NoCompletedRecording(id) => {
            warn!("Camera -> Nothing to share, no completed recording: {id}");
        }
        CameraError::ShareNotFound => warn!("Camera -> Share link not found or expired"),
    }
}

impl IntoResponse for CameraError {
    fn into_response(self) -> Response {
        log_error(&self);

        match self {
            Self::Database(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "A database error occurred.",
                None,
            ),
            Self::Internal(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected internal error occurred.",
                None,
            ),
            Self::NotFound(id) => error_response(
                StatusCode::NOT_FOUND,
                "Camera not found",
                Some(id.to_string()),
            ),
            Self::InvalidInput(message) => {
                error_response(StatusCode::BAD_REQUEST, "Invalid request", Some(message))
            }
            Self::NoCompletedRecording(id) => error_response(
                StatusCode::NOT_FOUND,
                "No completed recordings found for this camera",
                Some(id.to_string()),
            ),
            Self::ShareNotFound => error_response(
                StatusCode::NOT_FOUND,
                "Share link not found or expired",
                None,
            ),
        }
    }
}

impl From<DbError> for CameraError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlx(sql_err) => Self::Database(sql_err),
            DbError::SerdeJson(err) => Self::Internal(eyre::Report::new(err)),
        }
    }
}
