use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Audit {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub status: String,
    pub inspector: Option<String>,
    pub notes: Option<String>,
    pub checklist: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuditWithVehicle {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
    pub license_plate: String,
    pub vehicle_type: String,
}
