use crate::api_state::ApiContext;
use crate::detection::handlers::{
    detect_from_upload_handler, detect_from_url_handler, detect_labels_handler,
};
use axum::{Router, routing::post};

pub fn detection_router() -> Router<ApiContext> {
    Router::new()
        .route("/detections", post(detect_from_url_handler))
        .route("/detections/upload", post(detect_from_upload_handler))
        .route("/detections/labels", post(detect_labels_handler))
}
