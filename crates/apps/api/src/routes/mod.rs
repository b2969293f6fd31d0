mod api_doc;
pub mod cameras;
pub mod dashboard;
pub mod detection;
pub mod root;

use crate::api_state::ApiContext;
use crate::cameras::router::cameras_router;
use crate::dashboard::router::dashboard_router;
use crate::detection::router::detection_router;
use crate::root::router::root_public_router;
use crate::routes::api_doc::ApiDoc;
use axum::Router;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

// --- Router Construction ---
pub fn create_router(api_state: ApiContext) -> Router {
    Router::new()
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .merge(root_public_router())
        .merge(detection_router())
        .merge(cameras_router())
        .merge(dashboard_router())
        .with_state(api_state)
}
