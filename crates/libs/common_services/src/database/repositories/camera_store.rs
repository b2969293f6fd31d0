use crate::database::DbError;
use crate::database::camera::{Camera, CameraStatus, NewCamera, VideoProcessorType};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

pub struct CameraStore;

impl CameraStore {
    /// New cameras start inactive and not recording.
    pub async fn create(
        executor: impl Executor<'_, Database = Postgres>,
        camera: &NewCamera,
    ) -> Result<Camera, DbError> {
        Ok(sqlx::query_as::<_, Camera>(
            r#"
            INSERT INTO cameras (name, location, type, status, streaming_url, configuration)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&camera.name)
        .bind(&camera.location)
        .bind(camera.source_type.as_str())
        .bind(CameraStatus::Inactive.as_str())
        .bind(&camera.streaming_url)
        .bind(&camera.configuration)
        .fetch_one(executor)
        .await?)
    }

    pub async fn list(
        executor: impl Executor<'_, Database = Postgres>,
    ) -> Result<Vec<Camera>, DbError> {
        Ok(
            sqlx::query_as::<_, Camera>("SELECT * FROM cameras ORDER BY created_at DESC")
                .fetch_all(executor)
                .await?,
        )
    }

    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Postgres>,
        camera_id: Uuid,
    ) -> Result<Option<Camera>, DbError> {
        Ok(
            sqlx::query_as::<_, Camera>("SELECT * FROM cameras WHERE id = $1")
                .bind(camera_id)
                .fetch_optional(executor)
                .await?,
        )
    }

    pub async fn set_status(
        executor: impl Executor<'_, Database = Postgres>,
        camera_id: Uuid,
        status: CameraStatus,
    ) -> Result<Camera, DbError> {
        Ok(sqlx::query_as::<_, Camera>(
            "UPDATE cameras SET status = $1, updated_at = now() WHERE id = $2 RETURNING *",
        )
        .bind(status.as_str())
        .bind(camera_id)
        .fetch_one(executor)
        .await?)
    }

    pub async fn set_recording(
        executor: impl Executor<'_, Database = Postgres>,
        camera_id: Uuid,
        is_recording: bool,
    ) -> Result<Camera, DbError> {
        Ok(sqlx::query_as::<_, Camera>(
            "UPDATE cameras SET is_recording = $1, updated_at = now() WHERE id = $2 RETURNING *",
        )
        .bind(is_recording)
        .bind(camera_id)
        .fetch_one(executor)
        .await?)
    }

    /// Record the processor in `configuration`, keeping the other keys.
    pub async fn set_processor(
        executor: impl Executor<'_, Database = Postgres>,
        camera_id: Uuid,
        processor: VideoProcessorType,
    ) -> Result<Option<Camera>, DbError> {
        Ok(sqlx::query_as::<_, Camera>(
            r#"
            UPDATE cameras
            SET configuration = COALESCE(configuration, '{}'::jsonb)
                    || jsonb_build_object('processor_type', $1::text, 'updated_at', now()),
                updated_at = now()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(processor.as_str())
        .bind(camera_id)
        .fetch_optional(executor)
        .await?)
    }

    /// Recordings and their share links go with the camera; alerts and analytics keep their rows.
    pub async fn delete(
        executor: impl Executor<'_, Database = Postgres>,
        camera_id: Uuid,
    ) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM cameras WHERE id = $1")
            .bind(camera_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
