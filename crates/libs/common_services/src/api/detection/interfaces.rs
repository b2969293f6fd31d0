use crate::database::vehicle::Vehicle;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use vehicle_vision::{DetectedLabel, VehicleDetection};

/// Body of `POST /detections`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DetectionRequest {
    /// Publicly reachable http(s) url of the image to analyse.
    pub image_url: Option<String>,
    pub camera_id: Option<Uuid>,
}

/// Query of `POST /detections/upload`, the body is the raw image.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadDetectionParams {
    pub camera_id: Option<Uuid>,
    /// Where the uploaded image is stored, recorded on the vehicle when given.
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DetectionResponse {
    pub success: bool,
    pub message: String,
    pub vehicle_id: Uuid,
    pub is_new_vehicle: bool,
    pub alert_id: Option<Uuid>,
    pub vehicle: Vehicle,
    pub detection: VehicleDetection,
}

/// Labels of one live frame, used for on-screen overlays.
#[derive(Debug, Serialize, ToSchema)]
pub struct FrameLabelsResponse {
    pub labels: Vec<DetectedLabel>,
}
