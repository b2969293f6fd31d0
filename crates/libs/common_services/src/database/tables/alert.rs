use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::fmt;
use std::fmt::Display;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

impl AlertSeverity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Alert {
    pub id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub camera_id: Option<Uuid>,
    pub alert_type: String,
    pub event_type: Option<String>,
    pub severity: String,
    pub message: String,
    pub confidence: Option<f64>,
    pub event_metadata: Option<Value>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Alert joined with the names an operator recognises.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AlertWithContext {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub alert: Alert,
    pub camera_name: Option<String>,
    pub camera_location: Option<String>,
    pub license_plate: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub vehicle_id: Option<Uuid>,
    pub camera_id: Option<Uuid>,
    pub alert_type: String,
    pub event_type: Option<String>,
    pub severity: AlertSeverity,
    pub message: String,
    pub confidence: Option<f64>,
    pub event_metadata: Option<Value>,
}
