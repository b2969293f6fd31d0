use crate::database::DbError;
use crate::database::audit::AuditWithVehicle;
use sqlx::{Executor, Postgres};

pub struct AuditStore;

impl AuditStore {
    pub async fn list_with_vehicle(
        executor: impl Executor<'_, Database = Postgres>,
    ) -> Result<Vec<AuditWithVehicle>, DbError> {
        Ok(sqlx::query_as::<_, AuditWithVehicle>(
            r#"
            SELECT a.*, v.license_plate, v.vehicle_type
            FROM audits a
            JOIN vehicles v ON v.id = a.vehicle_id
            ORDER BY a.created_at DESC
            "#,
        )
        .fetch_all(executor)
        .await?)
    }
}
