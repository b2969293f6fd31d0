use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::fmt;
use std::fmt::Display;
use utoipa::ToSchema;
use uuid::Uuid;

/// How the camera feed reaches us.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CameraSourceType {
    /// Streaming software pushing to our RTMP ingest.
    #[default]
    Rtmp,
    /// Webcam captured in the operator's browser.
    Browser,
    /// Existing stream reachable at a direct url.
    Url,
}

impl CameraSourceType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rtmp => "rtmp",
            Self::Browser => "browser",
            Self::Url => "url",
        }
    }
}

/// Which backend analyses the frames of a camera.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VideoProcessorType {
    AwsRekognition,
    Custom,
    #[default]
    None,
}

impl VideoProcessorType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwsRekognition => "aws-rekognition",
            Self::Custom => "custom",
            Self::None => "none",
        }
    }
}

impl Display for VideoProcessorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    Active,
    Inactive,
}

impl CameraStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Anything that isn't `active` counts as inactive.
    #[must_use]
    pub fn from_db(value: &str) -> Self {
        if value == "active" {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }
}

impl Display for CameraSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for CameraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Camera {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub source_type: String,
    pub status: String,
    pub streaming_url: Option<String>,
    pub is_recording: bool,
    /// Stream details and `processor_type`.
    pub configuration: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCamera {
    pub name: String,
    pub location: String,
    pub source_type: CameraSourceType,
    pub streaming_url: Option<String>,
    pub configuration: Option<Value>,
}
