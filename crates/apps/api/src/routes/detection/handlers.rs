use crate::api_state::ApiContext;
use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, JsonRejection};
use axum::extract::{Query, State};
use common_services::api::detection::error::DetectionError;
use common_services::api::detection::interfaces::{
    DetectionRequest, DetectionResponse, FrameLabelsResponse, UploadDetectionParams,
};
use common_services::api::detection::service::{
    analyze_frame_labels, process_image_bytes, process_image_url,
};
use tracing::instrument;

/// Detect a vehicle in the image behind a url.
///
/// The vehicle is created on its first sighting and refreshed afterwards.
#[utoipa::path(
    post,
    path = "/detections",
    tag = "Detection",
    request_body = DetectionRequest,
    responses(
        (status = 200, description = "Vehicle detected and recorded.", body = DetectionResponse),
        (status = 400, description = "Missing, invalid, internal or oversized image url, or no license plate in the image."),
        (status = 500, description = "Download, image analysis or database failure."),
    )
)]
#[instrument(skip(context, payload))]
pub async fn detect_from_url_handler(
    State(context): State<ApiContext>,
    payload: Result<Json<DetectionRequest>, JsonRejection>,
) -> Result<Json<DetectionResponse>, DetectionError> {
    let Json(request) = payload.map_err(DetectionError::from)?;
    let response = process_image_url(
        &context.pool,
        &context.http_client,
        context.vision.as_ref(),
        request,
        context.settings.api.max_upload_bytes,
    )
    .await?;
    Ok(Json(response))
}

/// Detect a vehicle in an uploaded image.
///
/// The request body is the raw image.
#[utoipa::path(
    post,
    path = "/detections/upload",
    tag = "Detection",
    params(UploadDetectionParams),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Vehicle detected and recorded.", body = DetectionResponse),
        (status = 400, description = "Empty body, unknown camera or no license plate in the image."),
        (status = 413, description = "Image exceeds the upload limit."),
        (status = 500, description = "Image analysis or database failure."),
    )
)]
#[instrument(skip(context, body))]
pub async fn detect_from_upload_handler(
    State(context): State<ApiContext>,
    Query(params): Query<UploadDetectionParams>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<DetectionResponse>, DetectionError> {
    let body = body.map_err(DetectionError::from)?;
    let response = process_image_bytes(
        &context.pool,
        context.vision.as_ref(),
        &body,
        params.camera_id,
        params.image_url.as_deref(),
    )
    .await?;
    Ok(Json(response))
}

/// Label a camera frame without looking for a license plate.
///
/// Nothing is recorded.
#[utoipa::path(
    post,
    path = "/detections/labels",
    tag = "Detection",
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Labels found in the frame.", body = FrameLabelsResponse),
        (status = 400, description = "Empty body."),
        (status = 413, description = "Image exceeds the upload limit."),
        (status = 500, description = "Image analysis failure."),
    )
)]
#[instrument(skip(context, body))]
pub async fn detect_labels_handler(
    State(context): State<ApiContext>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<FrameLabelsResponse>, DetectionError> {
    let body = body.map_err(DetectionError::from)?;
    Ok(Json(
        analyze_frame_labels(context.vision.as_ref(), &body).await?,
    ))
}
