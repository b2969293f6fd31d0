use app_state::AppSettings;
use axum::Json;
use axum::extract::{Query, State};
use common_services::api::dashboard::error::DashboardError;
use common_services::api::dashboard::interfaces::{DailyEventCounts, VehicleListParams};
use common_services::api::dashboard::service::{
    analytics_events, audits, daily_analytics, recent_alerts, recent_vehicles,
};
use common_services::database::alert::AlertWithContext;
use common_services::database::analytics::AnalyticsEvent;
use common_services::database::audit::AuditWithVehicle;
use common_services::database::vehicle::Vehicle;
use sqlx::PgPool;
use tracing::instrument;

/// Vehicles ordered by when they were last seen.
#[utoipa::path(
    get,
    path = "/vehicles",
    tag = "Dashboard",
    params(VehicleListParams),
    responses(
        (status = 200, description = "Recently seen vehicles.", body = Vec<Vehicle>),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
#[instrument(skip(pool))]
pub async fn list_vehicles_handler(
    State(pool): State<PgPool>,
    Query(params): Query<VehicleListParams>,
) -> Result<Json<Vec<Vehicle>>, DashboardError> {
    let vehicles = recent_vehicles(&pool, params.effective_limit()).await?;
    Ok(Json(vehicles))
}

/// The most recent alerts with camera and plate details.
#[utoipa::path(
    get,
    path = "/alerts",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Recent alerts, newest first.", body = Vec<AlertWithContext>),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
#[instrument(skip(pool, settings))]
pub async fn list_alerts_handler(
    State(pool): State<PgPool>,
    State(settings): State<AppSettings>,
) -> Result<Json<Vec<AlertWithContext>>, DashboardError> {
    let limit = settings.dashboard.recent_alerts_limit;
    Ok(Json(recent_alerts(&pool, limit).await?))
}

#[utoipa::path(
    get,
    path = "/analytics",
    tag = "Dashboard",
    responses(
        (status = 200, description = "All analytics events, oldest first.", body = Vec<AnalyticsEvent>),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
#[instrument(skip(pool))]
pub async fn list_analytics_handler(
    State(pool): State<PgPool>,
) -> Result<Json<Vec<AnalyticsEvent>>, DashboardError> {
    Ok(Json(analytics_events(&pool).await?))
}

/// Event counts per day and event type, for charts.
#[utoipa::path(
    get,
    path = "/analytics/daily",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Per-day event counts, oldest day first.", body = Vec<DailyEventCounts>),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
#[instrument(skip(pool))]
pub async fn daily_analytics_handler(
    State(pool): State<PgPool>,
) -> Result<Json<Vec<DailyEventCounts>>, DashboardError> {
    Ok(Json(daily_analytics(&pool).await?))
}

#[utoipa::path(
    get,
    path = "/audits",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Vehicle audits, newest first.", body = Vec<AuditWithVehicle>),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
#[instrument(skip(pool))]
pub async fn list_audits_handler(
    State(pool): State<PgPool>,
) -> Result<Json<Vec<AuditWithVehicle>>, DashboardError> {
    Ok(Json(audits(&pool).await?))
}
