use crate::database::DbError;
use crate::database::alert::{Alert, AlertWithContext, NewAlert};
use sqlx::{Executor, Postgres};

pub struct AlertStore;

impl AlertStore {
    pub async fn create(
        executor: impl Executor<'_, Database = Postgres>,
        alert: &NewAlert,
    ) -> Result<Alert, DbError> {
        Ok(sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alerts (
                vehicle_id, camera_id, alert_type, event_type,
                severity, message, confidence, event_metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(alert.vehicle_id)
        .bind(alert.camera_id)
        .bind(&alert.alert_type)
        .bind(&alert.event_type)
        .bind(alert.severity.as_str())
        .bind(&alert.message)
        .bind(alert.confidence)
        .bind(&alert.event_metadata)
        .fetch_one(executor)
        .await?)
    }

    /// Newest alerts first, with camera and plate details attached when known.
    pub async fn list_recent(
        executor: impl Executor<'_, Database = Postgres>,
        limit: i64,
    ) -> Result<Vec<AlertWithContext>, DbError> {
        Ok(sqlx::query_as::<_, AlertWithContext>(
            r#"
            SELECT a.*,
                   c.name AS camera_name,
                   c.location AS camera_location,
                   v.license_plate
            FROM alerts a
            LEFT JOIN cameras c ON c.id = a.camera_id
            LEFT JOIN vehicles v ON v.id = a.vehicle_id
            ORDER BY a.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(executor)
        .await?)
    }
}
