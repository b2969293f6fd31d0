use app_state::AppSettings;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common_services::api::camera::error::CameraError;
use common_services::api::camera::interfaces::{
    CreateCameraRequest, RecordingToggleResponse, SharedRecordingResponse, UpdateProcessorRequest,
};
use common_services::api::camera::service::{
    add_camera, delete_camera, list_cameras, list_recordings, open_shared_recording,
    share_latest_recording, toggle_recording, toggle_status, update_processor,
};
use common_services::database::camera::Camera;
use common_services::database::shared_video::SharedVideo;
use common_services::database::video_recording::VideoRecording;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

/// List all cameras, newest first.
#[utoipa::path(
    get,
    path = "/cameras",
    tag = "Cameras",
    responses(
        (status = 200, description = "All cameras.", body = Vec<Camera>),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
#[instrument(skip(pool))]
pub async fn list_cameras_handler(
    State(pool): State<PgPool>,
) -> Result<Json<Vec<Camera>>, CameraError> {
    Ok(Json(list_cameras(&pool).await?))
}

/// Register a camera.
///
/// `rtmp` cameras get a generated stream key and ingest url.
#[utoipa::path(
    post,
    path = "/cameras",
    tag = "Cameras",
    request_body = CreateCameraRequest,
    responses(
        (status = 201, description = "Camera created.", body = Camera),
        (status = 400, description = "Missing name or location, or an invalid streaming url."),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
#[instrument(skip(pool, settings, payload))]
pub async fn create_camera_handler(
    State(pool): State<PgPool>,
    State(settings): State<AppSettings>,
    payload: Result<Json<CreateCameraRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Camera>), CameraError> {
    let Json(request) = payload.map_err(|e| CameraError::InvalidInput(e.body_text()))?;
    let camera = add_camera(&pool, &request, &settings.cameras.rtmp_server_url).await?;
    Ok((StatusCode::CREATED, Json(camera)))
}

/// Remove a camera together with its recordings.
#[utoipa::path(
    delete,
    path = "/cameras/{camera_id}",
    tag = "Cameras",
    params(
        ("camera_id" = Uuid, Path, description = "The camera to remove.")
    ),
    responses(
        (status = 204, description = "Camera removed."),
        (status = 404, description = "Camera not found."),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
#[instrument(skip(pool))]
pub async fn delete_camera_handler(
    State(pool): State<PgPool>,
    Path(camera_id): Path<Uuid>,
) -> Result<StatusCode, CameraError> {
    delete_camera(&pool, camera_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Switch a camera between active and inactive.
#[utoipa::path(
    post,
    path = "/cameras/{camera_id}/status",
    tag = "Cameras",
    params(
        ("camera_id" = Uuid, Path, description = "The camera to toggle.")
    ),
    responses(
        (status = 200, description = "The updated camera.", body = Camera),
        (status = 404, description = "Camera not found."),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
#[instrument(skip(pool))]
pub async fn toggle_status_handler(
    State(pool): State<PgPool>,
    Path(camera_id): Path<Uuid>,
) -> Result<Json<Camera>, CameraError> {
    Ok(Json(toggle_status(&pool, camera_id).await?))
}

/// Choose which processor analyses the camera's frames.
#[utoipa::path(
    patch,
    path = "/cameras/{camera_id}/processor",
    tag = "Cameras",
    params(
        ("camera_id" = Uuid, Path, description = "The camera to configure.")
    ),
    request_body = UpdateProcessorRequest,
    responses(
        (status = 200, description = "The updated camera.", body = Camera),
        (status = 400, description = "Unknown processor type."),
        (status = 404, description = "Camera not found."),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
#[instrument(skip(pool, payload))]
pub async fn update_processor_handler(
    State(pool): State<PgPool>,
    Path(camera_id): Path<Uuid>,
    payload: Result<Json<UpdateProcessorRequest>, JsonRejection>,
) -> Result<Json<Camera>, CameraError> {
    let Json(request) = payload.map_err(|e| CameraError::InvalidInput(e.body_text()))?;
    Ok(Json(
        update_processor(&pool, camera_id, request.processor_type).await?,
    ))
}

/// Start or stop recording a camera.
#[utoipa::path(
    post,
    path = "/cameras/{camera_id}/recording",
    tag = "Cameras",
    params(
        ("camera_id" = Uuid, Path, description = "The camera to toggle recording for.")
    ),
    responses(
        (status = 200, description = "The updated camera and affected recordings.", body = RecordingToggleResponse),
        (status = 404, description = "Camera not found."),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
#[instrument(skip(pool))]
pub async fn toggle_recording_handler(
    State(pool): State<PgPool>,
    Path(camera_id): Path<Uuid>,
) -> Result<Json<RecordingToggleResponse>, CameraError> {
    Ok(Json(toggle_recording(&pool, camera_id).await?))
}

#[utoipa::path(
    get,
    path = "/cameras/{camera_id}/recordings",
    tag = "Cameras",
    params(
        ("camera_id" = Uuid, Path, description = "The camera whose recordings to list.")
    ),
    responses(
        (status = 200, description = "Recordings of the camera, newest first.", body = Vec<VideoRecording>),
        (status = 404, description = "Camera not found."),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
#[instrument(skip(pool))]
pub async fn list_recordings_handler(
    State(pool): State<PgPool>,
    Path(camera_id): Path<Uuid>,
) -> Result<Json<Vec<VideoRecording>>, CameraError> {
    Ok(Json(list_recordings(&pool, camera_id).await?))
}

/// Share the latest completed recording of a camera.
///
/// The returned token stays valid for seven days.
#[utoipa::path(
    post,
    path = "/cameras/{camera_id}/share",
    tag = "Cameras",
    params(
        ("camera_id" = Uuid, Path, description = "The camera whose recording to share.")
    ),
    responses(
        (status = 201, description = "Share link created.", body = SharedVideo),
        (status = 404, description = "Camera not found, or it has no completed recording."),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
#[instrument(skip(pool))]
pub async fn share_recording_handler(
    State(pool): State<PgPool>,
    Path(camera_id): Path<Uuid>,
) -> Result<(StatusCode, Json<SharedVideo>), CameraError> {
    let shared = share_latest_recording(&pool, camera_id).await?;
    Ok((StatusCode::CREATED, Json(shared)))
}

#[utoipa::path(
    get,
    path = "/shared/{share_token}",
    tag = "Cameras",
    params(
        ("share_token" = Uuid, Path, description = "Token from a share link.")
    ),
    responses(
        (status = 200, description = "The shared recording.", body = SharedRecordingResponse),
        (status = 404, description = "Unknown or expired share link."),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
#[instrument(skip(pool))]
pub async fn open_shared_recording_handler(
    State(pool): State<PgPool>,
    Path(share_token): Path<Uuid>,
) -> Result<Json<SharedRecordingResponse>, CameraError> {
    Ok(Json(open_shared_recording(&pool, share_token).await?))
}
