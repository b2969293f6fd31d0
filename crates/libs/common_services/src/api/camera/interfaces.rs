use crate::database::camera::{Camera, CameraSourceType, VideoProcessorType};
use crate::database::shared_video::SharedVideo;
use crate::database::video_recording::VideoRecording;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /cameras`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCameraRequest {
    pub name: String,
    pub location: String,
    #[serde(rename = "type", default)]
    pub source_type: CameraSourceType,
    /// Required for `url` cameras, generated for `rtmp` ones.
    pub streaming_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordingToggleResponse {
    pub camera: Camera,
    /// The recording that was started, when recording got switched on.
    pub started: Option<VideoRecording>,
    /// Recordings completed by switching recording off.
    pub stopped: Vec<VideoRecording>,
}

/// Body of `PATCH /cameras/{camera_id}/processor`.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct UpdateProcessorRequest {
    pub processor_type: VideoProcessorType,
}

/// What a share link opens.
#[derive(Debug, Serialize, ToSchema)]
pub struct SharedRecordingResponse {
    pub share: SharedVideo,
    pub recording: VideoRecording,
}
