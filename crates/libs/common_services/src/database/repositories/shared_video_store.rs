use crate::database::DbError;
use crate::database::shared_video::{
    NewSharedVideo, PENDING_CUSTOMER_EMAIL, SHARE_ACTIVE, SharedVideo,
};
use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

pub struct SharedVideoStore;

impl SharedVideoStore {
    pub async fn create(
        executor: impl Executor<'_, Database = Postgres>,
        share: &NewSharedVideo,
    ) -> Result<SharedVideo, DbError> {
        Ok(sqlx::query_as::<_, SharedVideo>(
            r#"
            INSERT INTO shared_videos (video_recording_id, share_token, customer_email, status, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(share.video_recording_id)
        .bind(share.share_token)
        .bind(PENDING_CUSTOMER_EMAIL)
        .bind(SHARE_ACTIVE)
        .bind(share.expires_at)
        .fetch_one(executor)
        .await?)
    }

    /// Resolve a token that is still active at `now`, stamping the first view.
    pub async fn open_active(
        executor: impl Executor<'_, Database = Postgres>,
        share_token: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<SharedVideo>, DbError> {
        Ok(sqlx::query_as::<_, SharedVideo>(
            r#"
            UPDATE shared_videos
            SET viewed_at = COALESCE(viewed_at, $3)
            WHERE share_token = $1 AND status = $2 AND expires_at > $3
            RETURNING *
            "#,
        )
        .bind(share_token)
        .bind(SHARE_ACTIVE)
        .bind(now)
        .fetch_optional(executor)
        .await?)
    }
}
