use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const RECORDING_ACTIVE: &str = "recording";
pub const RECORDING_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct VideoRecording {
    pub id: Uuid,
    pub camera_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub storage_path: String,
    pub status: String,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// Where a recording started at `started_at` gets stored.
#[must_use]
pub fn recording_storage_path(camera_id: Uuid, started_at: DateTime<Utc>) -> String {
    format!("recordings/{camera_id}/{}.mp4", started_at.timestamp_millis())
}
