use crate::database::DbError;
use crate::database::vehicle::{UpsertedVehicle, Vehicle};
use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use vehicle_vision::VehicleDetection;

pub struct VehicleStore;

impl VehicleStore {
    /// Insert a vehicle for a newly seen plate, or refresh the row of a known one.
    ///
    /// A single statement, so two requests for the same plate cannot both insert.
    /// `entry_timestamp` and the first `confidence` are kept on update.
    pub async fn upsert_detection(
        executor: impl Executor<'_, Database = Postgres>,
        detection: &VehicleDetection,
        image_url: Option<&str>,
        seen_at: DateTime<Utc>,
    ) -> Result<UpsertedVehicle, DbError> {
        let damage_assessment = serde_json::to_value(&detection.damage)?;
        let measurements = detection
            .measurements
            .map(serde_json::to_value)
            .transpose()?;

        Ok(sqlx::query_as::<_, UpsertedVehicle>(
            r#"
            INSERT INTO vehicles (
                license_plate, confidence, quality_score, vehicle_type,
                damage_detected, damage_confidence, damage_assessment, measurements,
                image_url, entry_timestamp, exit_timestamp, last_seen
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10, $10)
            ON CONFLICT (license_plate) DO UPDATE SET
                quality_score = EXCLUDED.quality_score,
                vehicle_type = EXCLUDED.vehicle_type,
                damage_detected = EXCLUDED.damage_detected,
                damage_confidence = EXCLUDED.damage_confidence,
                damage_assessment = EXCLUDED.damage_assessment,
                measurements = COALESCE(EXCLUDED.measurements, vehicles.measurements),
                image_url = COALESCE(EXCLUDED.image_url, vehicles.image_url),
                exit_timestamp = EXCLUDED.exit_timestamp,
                last_seen = EXCLUDED.last_seen
            RETURNING vehicles.*, (xmax = 0) AS inserted
            "#,
        )
        .bind(&detection.license_plate)
        .bind(detection.confidence)
        .bind(detection.quality_score)
        .bind(&detection.vehicle_type)
        .bind(detection.damage.damage_detected)
        .bind(detection.damage.damage_confidence)
        .bind(damage_assessment)
        .bind(measurements)
        .bind(image_url)
        .bind(seen_at)
        .fetch_one(executor)
        .await?)
    }

    pub async fn find_by_plate(
        executor: impl Executor<'_, Database = Postgres>,
        license_plate: &str,
    ) -> Result<Option<Vehicle>, DbError> {
        Ok(
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE license_plate = $1")
                .bind(license_plate)
                .fetch_optional(executor)
                .await?,
        )
    }

    /// Most recently seen vehicles first.
    pub async fn list_recent(
        executor: impl Executor<'_, Database = Postgres>,
        limit: i64,
    ) -> Result<Vec<Vehicle>, DbError> {
        Ok(sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles ORDER BY last_seen DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(executor)
        .await?)
    }
}
