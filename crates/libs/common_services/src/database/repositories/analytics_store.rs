use crate::database::DbError;
use crate::database::analytics::{AnalyticsEvent, NewAnalyticsEvent};
use sqlx::{Executor, Postgres};

pub struct AnalyticsStore;

impl AnalyticsStore {
    pub async fn create(
        executor: impl Executor<'_, Database = Postgres>,
        event: &NewAnalyticsEvent,
    ) -> Result<AnalyticsEvent, DbError> {
        Ok(sqlx::query_as::<_, AnalyticsEvent>(
            r#"
            INSERT INTO analytics (event_type, camera_id, vehicle_id, event_data)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&event.event_type)
        .bind(event.camera_id)
        .bind(event.vehicle_id)
        .bind(&event.event_data)
        .fetch_one(executor)
        .await?)
    }

    /// Oldest first, the order charts consume them in.
    pub async fn list_all(
        executor: impl Executor<'_, Database = Postgres>,
    ) -> Result<Vec<AnalyticsEvent>, DbError> {
        Ok(
            sqlx::query_as::<_, AnalyticsEvent>("SELECT * FROM analytics ORDER BY timestamp ASC")
                .fetch_all(executor)
                .await?,
        )
    }
}
