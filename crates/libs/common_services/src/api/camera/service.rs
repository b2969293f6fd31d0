use crate::api::camera::error::CameraError;
use crate::api::camera::interfaces::{
    CreateCameraRequest, RecordingToggleResponse, SharedRecordingResponse,
};
use crate::database::camera::{
    Camera, CameraSourceType, CameraStatus, NewCamera, VideoProcessorType,
};
use crate::database::shared_video::{NewSharedVideo, SharedVideo};
use crate::database::video_recording::{VideoRecording, recording_storage_path};
use crate::database::{CameraStore, RecordingStore, SharedVideoStore};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, instrument};
use url::Url;
use uuid::Uuid;

/// Validate a create request and fill in what the server generates.
///
/// `rtmp` cameras get a fresh stream key appended to the ingest url.
pub fn prepare_camera(
    request: &CreateCameraRequest,
    rtmp_server_url: &str,
    stream_key: Uuid,
) -> Result<NewCamera, CameraError> {
    let name = request.name.trim();
    let location = request.location.trim();
    if name.is_empty() {
        return Err(CameraError::InvalidInput("name is required".to_string()));
    }
    if location.is_empty() {
        return Err(CameraError::InvalidInput("location is required".to_string()));
    }

    let (streaming_url, configuration) = match request.source_type {
        CameraSourceType::Rtmp => {
            let base = rtmp_server_url.trim_end_matches('/');
            (
                Some(format!("{base}/{stream_key}")),
                Some(json!({ "stream_key": stream_key, "rtmp_url": base })),
            )
        }
        CameraSourceType::Url => {
            let raw = request
                .streaming_url
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .ok_or_else(|| {
                    CameraError::InvalidInput("streaming_url is required for url cameras".into())
                })?;
            let url = Url::parse(raw).map_err(|e| {
                CameraError::InvalidInput(format!("streaming_url is not a valid url: {e}"))
            })?;
            (Some(url.to_string()), None)
        }
        CameraSourceType::Browser => (None, None),
    };

    Ok(NewCamera {
        name: name.to_string(),
        location: location.to_string(),
        source_type: request.source_type,
        streaming_url,
        configuration,
    })
}

#[instrument(skip(pool), err(Debug))]
pub async fn add_camera(
    pool: &PgPool,
    request: &CreateCameraRequest,
    rtmp_server_url: &str,
) -> Result<Camera, CameraError> {
    let new_camera = prepare_camera(request, rtmp_server_url, Uuid::new_v4())?;
    let camera = CameraStore::create(pool, &new_camera).await?;
    info!(camera_id = %camera.id, "Added {} camera {}", camera.source_type, camera.name);
    Ok(camera)
}

#[instrument(skip(pool), err(Debug))]
pub async fn list_cameras(pool: &PgPool) -> Result<Vec<Camera>, CameraError> {
    Ok(CameraStore::list(pool).await?)
}

async fn get_camera(pool: &PgPool, camera_id: Uuid) -> Result<Camera, CameraError> {
    CameraStore::find_by_id(pool, camera_id)
        .await?
        .ok_or(CameraError::NotFound(camera_id))
}

/// Flip a camera between `active` and `inactive`.
#[instrument(skip(pool), err(Debug))]
pub async fn toggle_status(pool: &PgPool, camera_id: Uuid) -> Result<Camera, CameraError> {
    let camera = get_camera(pool, camera_id).await?;
    let status = CameraStatus::from_db(&camera.status).toggled();
    let camera = CameraStore::set_status(pool, camera_id, status).await?;
    info!(%camera_id, "Camera is now {status}");
    Ok(camera)
}

/// Start recording when idle, otherwise complete the running recordings.
///
/// The flag and the recording rows change in one transaction.
#[instrument(skip(pool), err(Debug))]
pub async fn toggle_recording(
    pool: &PgPool,
    camera_id: Uuid,
) -> Result<RecordingToggleResponse, CameraError> {
    let mut tx = pool.begin().await?;
    let camera = CameraStore::find_by_id(&mut *tx, camera_id)
        .await?
        .ok_or(CameraError::NotFound(camera_id))?;

    let now = Utc::now();
    let response = if camera.is_recording {
        let stopped = RecordingStore::stop_active(&mut *tx, camera_id, now).await?;
        let camera = CameraStore::set_recording(&mut *tx, camera_id, false).await?;
        info!(%camera_id, "Stopped {} recording(s)", stopped.len());
        RecordingToggleResponse {
            camera,
            started: None,
            stopped,
        }
    } else {
        let path = recording_storage_path(camera_id, now);
        let started = RecordingStore::start(&mut *tx, camera_id, now, &path).await?;
        let camera = CameraStore::set_recording(&mut *tx, camera_id, true).await?;
        info!(%camera_id, "Started recording to {path}");
        RecordingToggleResponse {
            camera,
            started: Some(started),
            stopped: vec![],
        }
    };
    tx.commit().await?;

    Ok(response)
}

#[instrument(skip(pool), err(Debug))]
pub async fn list_recordings(
    pool: &PgPool,
    camera_id: Uuid,
) -> Result<Vec<VideoRecording>, CameraError> {
    get_camera(pool, camera_id).await?;
    Ok(RecordingStore::list_for_camera(pool, camera_id).await?)
}

#[instrument(skip(pool), err(Debug))]
pub async fn delete_camera(pool: &PgPool, camera_id: Uuid) -> Result<(), CameraError> {
    if !CameraStore::delete(pool, camera_id).await? {
        return Err(CameraError::NotFound(camera_id));
    }
    info!(%camera_id, "Camera removed");
    Ok(())
}

#[instrument(skip(pool), err(Debug))]
pub async fn update_processor(
    pool: &PgPool,
    camera_id: Uuid,
    processor: VideoProcessorType,
) -> Result<Camera, CameraError> {
    let camera = CameraStore::set_processor(pool, camera_id, processor)
        .await?
        .ok_or(CameraError::NotFound(camera_id))?;
    info!(%camera_id, "Camera frames now go to {processor}");
    Ok(camera)
}

/// Create a share link for the camera's most recently completed recording.
///
/// Links expire after seven days.
#[instrument(skip(pool), err(Debug))]
pub async fn share_latest_recording(
    pool: &PgPool,
    camera_id: Uuid,
) -> Result<SharedVideo, CameraError> {
    get_camera(pool, camera_id).await?;
    let recording = RecordingStore::latest_completed(pool, camera_id)
        .await?
        .ok_or(CameraError::NoCompletedRecording(camera_id))?;

    let share = NewSharedVideo::for_recording(recording.id, Uuid::new_v4(), Utc::now());
    let shared = SharedVideoStore::create(pool, &share).await?;
    info!(%camera_id, recording_id = %recording.id, "Shared recording until {}", shared.expires_at);
    Ok(shared)
}

#[instrument(skip(pool), err(Debug))]
pub async fn open_shared_recording(
    pool: &PgPool,
    share_token: Uuid,
) -> Result<SharedRecordingResponse, CameraError> {
    let share = SharedVideoStore::open_active(pool, share_token, Utc::now())
        .await?
        .ok_or(CameraError::ShareNotFound)?;
    let recording = RecordingStore::find_by_id(pool, share.video_recording_id)
        .await?
        .ok_or(CameraError::ShareNotFound)?;
    Ok(SharedRecordingResponse { share, recording })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(source_type: CameraSourceType, streaming_url: Option<&str>) -> CreateCameraRequest {
        CreateCameraRequest {
            name: " Gate 1 ".to_string(),
            location: "North entrance".to_string(),
            source_type,
            streaming_url: streaming_url.map(str::to_string),
        }
    }

    #[test]
    fn rtmp_camera_gets_stream_url() {
        let key = Uuid::new_v4();
        let camera = prepare_camera(
            &request(CameraSourceType::Rtmp, None),
            "rtmp://ingest.local/live/",
            key,
        )
        .expect("valid camera");
        assert_eq!(camera.name, "Gate 1");
        assert_eq!(
            camera.streaming_url,
            Some(format!("rtmp://ingest.local/live/{key}"))
        );
        let config = camera.configuration.expect("rtmp configuration");
        assert_eq!(config["stream_key"], key.to_string());
        assert_eq!(config["rtmp_url"], "rtmp://ingest.local/live");
    }

    #[test]
    fn url_camera_requires_valid_url() {
        let key = Uuid::new_v4();
        assert!(matches!(
            prepare_camera(&request(CameraSourceType::Url, None), "rtmp://x", key),
            Err(CameraError::InvalidInput(_))
        ));
        assert!(matches!(
            prepare_camera(&request(CameraSourceType::Url, Some("nope")), "rtmp://x", key),
            Err(CameraError::InvalidInput(_))
        ));
        let camera = prepare_camera(
            &request(CameraSourceType::Url, Some("http://cam.local/stream")),
            "rtmp://x",
            key,
        )
        .expect("valid camera");
        assert_eq!(camera.streaming_url.as_deref(), Some("http://cam.local/stream"));
        assert_eq!(camera.configuration, None);
    }

    #[test]
    fn browser_camera_has_no_stream() {
        let camera = prepare_camera(
            &request(CameraSourceType::Browser, Some("ignored")),
            "rtmp://x",
            Uuid::new_v4(),
        )
        .expect("valid camera");
        assert_eq!(camera.streaming_url, None);
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut req = request(CameraSourceType::Browser, None);
        req.name = "  ".to_string();
        assert!(matches!(
            prepare_camera(&req, "rtmp://x", Uuid::new_v4()),
            Err(CameraError::InvalidInput(_))
        ));
    }

    #[test]
    fn share_link_expires_after_a_week() {
        let now = Utc::now();
        let recording_id = Uuid::new_v4();
        let token = Uuid::new_v4();
        let share = NewSharedVideo::for_recording(recording_id, token, now);
        assert_eq!(share.video_recording_id, recording_id);
        assert_eq!(share.share_token, token);
        assert_eq!(share.expires_at - now, chrono::Duration::days(7));
    }

    #[sqlx::test]
    #[ignore = "requires a postgres DATABASE_URL"]
    async fn recording_can_be_shared_then_camera_removed(pool: PgPool) -> Result<(), CameraError> {
        let camera = add_camera(
            &pool,
            &request(CameraSourceType::Browser, None),
            "rtmp://x",
        )
        .await?;
        assert!(matches!(
            share_latest_recording(&pool, camera.id).await,
            Err(CameraError::NoCompletedRecording(_))
        ));

        let started = toggle_recording(&pool, camera.id).await?;
        assert!(started.camera.is_recording);
        let stopped = toggle_recording(&pool, camera.id).await?;
        assert_eq!(stopped.stopped.len(), 1);

        let share = share_latest_recording(&pool, camera.id).await?;
        assert_eq!(share.video_recording_id, stopped.stopped[0].id);
        let opened = open_shared_recording(&pool, share.share_token).await?;
        assert!(opened.share.viewed_at.is_some());
        assert_eq!(opened.recording.id, share.video_recording_id);

        let camera = update_processor(&pool, camera.id, VideoProcessorType::AwsRekognition).await?;
        let config = camera.configuration.expect("configuration");
        assert_eq!(config["processor_type"], "aws-rekognition");

        delete_camera(&pool, camera.id).await?;
        assert!(matches!(
            delete_camera(&pool, camera.id).await,
            Err(CameraError::NotFound(_))
        ));
        assert!(matches!(
            open_shared_recording(&pool, share.share_token).await,
            Err(CameraError::ShareNotFound)
        ));
        Ok(())
    }
}
