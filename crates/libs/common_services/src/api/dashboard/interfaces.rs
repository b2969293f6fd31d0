use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_VEHICLE_LIMIT: i64 = 200;
pub const MAX_VEHICLE_LIMIT: i64 = 1000;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VehicleListParams {
    /// Defaults to 200, capped at 1000.
    pub limit: Option<i64>,
}

impl VehicleListParams {
    #[must_use]
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_VEHICLE_LIMIT)
            .clamp(1, MAX_VEHICLE_LIMIT)
    }
}

/// Number of analytics events per type for one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DailyEventCounts {
    pub date: NaiveDate,
    pub total: i64,
    pub counts: BTreeMap<String, i64>,
}
