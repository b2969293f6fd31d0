use crate::database::DbError;
use crate::database::video_recording::{RECORDING_ACTIVE, RECORDING_COMPLETED, VideoRecording};
use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

pub struct RecordingStore;

impl RecordingStore {
    pub async fn start(
        executor: impl Executor<'_, Database = Postgres>,
        camera_id: Uuid,
        start_time: DateTime<Utc>,
        storage_path: &str,
    ) -> Result<VideoRecording, DbError> {
        Ok(sqlx::query_as::<_, VideoRecording>(
            r#"
            INSERT INTO video_recordings (camera_id, start_time, storage_path, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(camera_id)
        .bind(start_time)
        .bind(storage_path)
        .bind(RECORDING_ACTIVE)
        .fetch_one(executor)
        .await?)
    }

    /// Complete every recording of the camera that is still running.
    pub async fn stop_active(
        executor: impl Executor<'_, Database = Postgres>,
        camera_id: Uuid,
        end_time: DateTime<Utc>,
    ) -> Result<Vec<VideoRecording>, DbError> {
        Ok(sqlx::query_as::<_, VideoRecording>(
            r#"
            UPDATE video_recordings
            SET end_time = $1, status = $2
            WHERE camera_id = $3 AND status = $4
            RETURNING *
            "#,
        )
        .bind(end_time)
        .bind(RECORDING_COMPLETED)
        .bind(camera_id)
        .bind(RECORDING_ACTIVE)
        .fetch_all(executor)
        .await?)
    }

    pub async fn list_for_camera(
        executor: impl Executor<'_, Database = Postgres>,
        camera_id: Uuid,
    ) -> Result<Vec<VideoRecording>, DbError> {
        Ok(sqlx::query_as::<_, VideoRecording>(
            "SELECT * FROM video_recordings WHERE camera_id = $1 ORDER BY start_time DESC",
        )
        .bind(camera_id)
        .fetch_all(executor)
        .await?)
    }

    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Postgres>,
        recording_id: Uuid,
    ) -> Result<Option<VideoRecording>, DbError> {
        Ok(
            sqlx::query_as::<_, VideoRecording>("SELECT * FROM video_recordings WHERE id = $1")
                .bind(recording_id)
                .fetch_optional(executor)
                .await?,
        )
    }

    /// The completed recording of the camera that ended last.
    pub async fn latest_completed(
        executor: impl Executor<'_, Database = Postgres>,
        camera_id: Uuid,
    ) -> Result<Option<VideoRecording>, DbError> {
        Ok(sqlx::query_as::<_, VideoRecording>(
            r#"
            SELECT * FROM video_recordings
            WHERE camera_id = $1 AND status = $2
            ORDER BY end_time DESC NULLS LAST
            LIMIT 1
            "#,
        )
        .bind(camera_id)
        .bind(RECORDING_COMPLETED)
        .fetch_optional(executor)
        .await?)
    }
}
