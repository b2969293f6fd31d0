use crate::api::dashboard::error::DashboardError;
use crate::api::dashboard::interfaces::DailyEventCounts;
use crate::database::alert::AlertWithContext;
use crate::database::analytics::AnalyticsEvent;
use crate::database::audit::AuditWithVehicle;
use crate::database::vehicle::Vehicle;
use crate::database::{AlertStore, AnalyticsStore, AuditStore, VehicleStore};
use chrono::NaiveDate;
use sqlx::PgPool;
use std::collections::BTreeMap;
use tracing::instrument;

#[instrument(skip(pool), err(Debug))]
pub async fn recent_vehicles(pool: &PgPool, limit: i64) -> Result<Vec<Vehicle>, DashboardError> {
    Ok(VehicleStore::list_recent(pool, limit).await?)
}

#[instrument(skip(pool), err(Debug))]
pub async fn recent_alerts(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<AlertWithContext>, DashboardError> {
    Ok(AlertStore::list_recent(pool, limit.max(1)).await?)
}

#[instrument(skip(pool), err(Debug))]
pub async fn analytics_events(pool: &PgPool) -> Result<Vec<AnalyticsEvent>, DashboardError> {
    Ok(AnalyticsStore::list_all(pool).await?)
}

#[instrument(skip(pool), err(Debug))]
pub async fn daily_analytics(pool: &PgPool) -> Result<Vec<DailyEventCounts>, DashboardError> {
    let events = AnalyticsStore::list_all(pool).await?;
    Ok(daily_event_counts(&events))
}

#[instrument(skip(pool), err(Debug))]
pub async fn audits(pool: &PgPool) -> Result<Vec<AuditWithVehicle>, DashboardError> {
    Ok(AuditStore::list_with_vehicle(pool).await?)
}

/// Bucket events per UTC day and event type, oldest day first.
#[must_use]
pub fn daily_event_counts(events: &[AnalyticsEvent]) -> Vec<DailyEventCounts> {
    let mut days: BTreeMap<NaiveDate, BTreeMap<String, i64>> = BTreeMap::new();
    for event in events {
        *days
            .entry(event.timestamp.date_naive())
            .or_default()
            .entry(event.event_type.clone())
            .or_default() += 1;
    }

    days.into_iter()
        .map(|(date, counts)| DailyEventCounts {
            date,
            total: counts.values().sum(),
            counts,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dashboard::interfaces::VehicleListParams;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn event(event_type: &str, day: u32, hour: u32) -> AnalyticsEvent {
        AnalyticsEvent {
            id: Uuid::new_v4(),
            event_type: event_type.to_string(),
            camera_id: None,
            vehicle_id: None,
            event_data: None,
            timestamp: Utc
                .with_ymd_and_hms(2025, 3, day, hour, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn counts_events_per_day_and_type() {
        let events = vec![
            event("vehicle_detected", 2, 23),
            event("vehicle_detected", 1, 8),
            event("vehicle_detected", 1, 9),
            event("camera_offline", 1, 12),
        ];

        let days = daily_event_counts(&events);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 3, 1).expect("date"));
        assert_eq!(days[0].total, 3);
        assert_eq!(days[0].counts["vehicle_detected"], 2);
        assert_eq!(days[0].counts["camera_offline"], 1);
        assert_eq!(days[1].total, 1);
    }

    #[test]
    fn no_events_no_days() {
        assert!(daily_event_counts(&[]).is_empty());
    }

    #[test]
    fn vehicle_limit_is_clamped() {
        assert_eq!(VehicleListParams { limit: None }.effective_limit(), 200);
        assert_eq!(VehicleListParams { limit: Some(0) }.effective_limit(), 1);
        assert_eq!(VehicleListParams { limit: Some(5000) }.effective_limit(), 1000);
        assert_eq!(VehicleListParams { limit: Some(25) }.effective_limit(), 25);
    }
}
