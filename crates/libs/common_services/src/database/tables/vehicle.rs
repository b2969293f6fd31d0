use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A vehicle, keyed by its license plate.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Vehicle {
    pub id: Uuid,
    pub license_plate: String,
    /// Plate confidence of the first detection.
    pub confidence: f64,
    /// Plate confidence of the latest detection.
    pub quality_score: f64,
    pub vehicle_type: String,
    pub damage_detected: bool,
    pub damage_confidence: f64,
    pub damage_assessment: Option<Value>,
    pub measurements: Option<Value>,
    pub image_url: Option<String>,
    pub entry_timestamp: DateTime<Utc>,
    pub exit_timestamp: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct UpsertedVehicle {
    #[sqlx(flatten)]
    pub vehicle: Vehicle,
    /// `false` when an existing row for the plate was updated.
    pub inserted: bool,
}
