use crate::api_state::ApiContext;
use crate::dashboard::handlers::{
    daily_analytics_handler, list_alerts_handler, list_analytics_handler, list_audits_handler,
    list_vehicles_handler,
};
use axum::{Router, routing::get};

pub fn dashboard_router() -> Router<ApiContext> {
    Router::new()
        .route("/vehicles", get(list_vehicles_handler))
        .route("/alerts", get(list_alerts_handler))
        .route("/analytics", get(list_analytics_handler))
        .route("/analytics/daily", get(daily_analytics_handler))
        .route("/audits", get(list_audits_handler))
}
