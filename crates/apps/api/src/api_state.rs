use app_state::AppSettings;
use axum::extract::FromRef;
use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;
use vehicle_vision::VisionProvider;

#[derive(Clone)]
pub struct ApiContext {
    pub pool: PgPool,
    pub http_client: Client,
    pub vision: Arc<dyn VisionProvider>,
    pub settings: AppSettings,
}

// Handlers that only touch the database or settings extract just that part.
impl FromRef<ApiContext> for PgPool {
    fn from_ref(state: &ApiContext) -> Self {
        state.pool.clone()
    }
}

impl FromRef<ApiContext> for AppSettings {
    fn from_ref(state: &ApiContext) -> Self {
        state.settings.clone()
    }
}
