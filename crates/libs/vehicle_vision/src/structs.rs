use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Relative box as returned by the provider, every value is a fraction of the image size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BoundingBox {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum TextKind {
    Line,
    Word,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TextDetection {
    pub text: String,
    pub kind: TextKind,
    /// 0..1
    pub confidence: f64,
    pub bounding_box: Option<BoundingBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DetectedLabel {
    pub name: String,
    /// 0..1
    pub confidence: f64,
    pub bounding_box: Option<BoundingBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ModerationLabel {
    pub name: String,
    /// 0..1
    pub confidence: f64,
}

/// Everything the provider said about one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VisionAnalysis {
    pub text_detections: Vec<TextDetection>,
    pub labels: Vec<DetectedLabel>,
    pub moderation_labels: Vec<ModerationLabel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VehicleMeasurements {
    pub width: f64,
    pub height: f64,
    pub aspect_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DamageIndicator {
    #[serde(rename = "type")]
    pub kind: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DamageAssessment {
    pub damage_detected: bool,
    pub damage_confidence: f64,
    pub damage_details: Vec<DamageIndicator>,
}

/// Flat record derived from one image, anchored on its license plate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VehicleDetection {
    pub license_plate: String,
    pub confidence: f64,
    pub quality_score: f64,
    pub vehicle_type: String,
    pub plate_bounding_box: Option<BoundingBox>,
    pub measurements: Option<VehicleMeasurements>,
    pub damage: DamageAssessment,
}
