use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const SHARE_ACTIVE: &str = "active";
/// Recipient is not known when the link is created.
pub const PENDING_CUSTOMER_EMAIL: &str = "pending";
pub const SHARE_LINK_TTL_DAYS: i64 = 7;

/// A tokenised link handing one recording to someone outside the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SharedVideo {
    pub id: Uuid,
    pub video_recording_id: Uuid,
    pub share_token: Uuid,
    pub customer_email: String,
    pub status: String,
    pub expires_at: DateTime<Utc>,
    pub viewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSharedVideo {
    pub video_recording_id: Uuid,
    pub share_token: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl NewSharedVideo {
    #[must_use]
    pub fn for_recording(video_recording_id: Uuid, share_token: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            video_recording_id,
            share_token,
            expires_at: now + Duration::days(SHARE_LINK_TTL_DAYS),
        }
    }
}
