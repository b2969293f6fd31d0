use crate::api::error_response;
use crate::database::DbError;
use axum::extract::rejection::{BytesRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use thiserror::Error;
use tracing::{error, warn};
use vehicle_vision::{InterpretError, VisionError};

#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Invalid request: {0}")]
    InvalidInput(String),

    #[error("No license plate detected in image")]
    NoPlateDetected,

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to download image: {0}")]
    ImageDownload(String),

    #[error("Image analysis failed: {0}")]
    Vision(String),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("internal error")]
    Internal(#[from] eyre::Report),
}

impl DetectionError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::NoPlateDetected => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Configuration(_)
            | Self::ImageDownload(_)
            | Self::Vision(_)
            | Self::Database(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn log_error(err: &DetectionError) {
    match err {
        DetectionError::InvalidInput(message) => warn!("Detection -> Invalid input: {message}"),
        DetectionError::NoPlateDetected => warn!("Detection -> No license plate in image"),
        DetectionError::PayloadTooLarge(message) => warn!("Detection -> Body too large: {message}"),
        DetectionError::Configuration(message) => error!("Detection -> Misconfigured: {message}"),
        DetectionError::ImageDownload(message) => error!("Detection -> Download failed: {message}"),
        DetectionError::Vision(message) => error!("Detection -> Vision API failed: {message}"),
        DetectionError::Database(e) => error!("Detection -> Database query failed: {e}"),
        DetectionError::Internal(e) => error!("Detection -> Internal error: {e:?}"),
    }
}

impl IntoResponse for DetectionError {
    fn into_response(self) -> Response {
        log_error(&self);
        let status = self.status_code();

        match self {
            Self::InvalidInput(message) => error_response(status, "Invalid request", Some(message)),
            Self::NoPlateDetected => {
                error_response(status, "No license plate detected in image", None)
            }
            Self::PayloadTooLarge(message) => {
                error_response(status, "Image exceeds the upload limit.", Some(message))
            }
            Self::Configuration(message) => error_response(
                status,
                "Image analysis is not configured on this server.",
                Some(message),
            ),
            Self::ImageDownload(message) => {
                error_response(status, "Failed to download image.", Some(message))
            }
            Self::Vision(message) => error_response(status, "Image analysis failed.", Some(message)),
            Self::Database(_) => error_response(status, "A database error occurred.", None),
            Self::Internal(_) => {
                error_response(status, "An unexpected internal error occurred.", None)
            }
        }
    }
}

impl From<VisionError> for DetectionError {
    fn from(err: VisionError) -> Self {
        match err {
            VisionError::MissingCredentials => Self::Configuration(err.to_string()),
            VisionError::EmptyImage => Self::InvalidInput(err.to_string()),
            VisionError::Provider(message) => Self::Vision(message),
        }
    }
}

/// Extractor failures keep their status class: 413 for an oversized body, 400 otherwise.
fn from_rejection(status: StatusCode, message: String) -> DetectionError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        DetectionError::PayloadTooLarge(message)
    } else {
        DetectionError::InvalidInput(message)
    }
}

impl From<BytesRejection> for DetectionError {
    fn from(rejection: BytesRejection) -> Self {
        from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<JsonRejection> for DetectionError {
    fn from(rejection: JsonRejection) -> Self {
        from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<InterpretError> for DetectionError {
    fn from(err: InterpretError) -> Self {
        match err {
            InterpretError::NoPlateDetected => Self::NoPlateDetected,
        }
    }
}

impl From<DbError> for DetectionError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlx(sql_err) => Self::Database(sql_err),
            DbError::SerdeJson(err) => Self::Internal(eyre::Report::new(err)),
        }
    }
}

impl From<serde_json::Error> for DetectionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(eyre::Report::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(err: DetectionError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn no_plate_is_a_bad_request_without_details() {
        let (status, body) = body_of(DetectionError::NoPlateDetected).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No license plate detected in image");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn invalid_input_carries_details() {
        let (status, body) =
            body_of(DetectionError::InvalidInput("image_url is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], "image_url is required");
    }

    #[tokio::test]
    async fn oversized_body_keeps_the_error_envelope() {
        let (status, body) =
            body_of(DetectionError::PayloadTooLarge("length limit exceeded".into())).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "Image exceeds the upload limit.");
        assert_eq!(body["details"], "length limit exceeded");
    }

    #[test]
    fn vision_errors_map_to_taxonomy() {
        assert!(matches!(
            DetectionError::from(VisionError::MissingCredentials),
            DetectionError::Configuration(_)
        ));
        assert_eq!(
            DetectionError::from(VisionError::EmptyImage).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DetectionError::from(VisionError::Provider("throttled".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            DetectionError::Configuration("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
