use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const VEHICLE_DETECTED_EVENT: &str = "vehicle_detected";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub event_type: String,
    pub camera_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub event_data: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalyticsEvent {
    pub event_type: String,
    pub camera_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub event_data: Option<Value>,
}
