use crate::api_state::ApiContext;
use crate::create_router;
use app_state::{ApiSettings, AppSettings};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use http::{HeaderName, HeaderValue, header};
use reqwest::Client;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use vehicle_vision::VisionProvider;

/// The headers browser clients of the dashboard send.
fn allowed_headers() -> [HeaderName; 4] {
    [
        header::AUTHORIZATION,
        HeaderName::from_static("x-client-info"),
        HeaderName::from_static("apikey"),
        header::CONTENT_TYPE,
    ]
}

#[must_use]
pub fn cors_layer(settings: &ApiSettings) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(cors::Any)
        .allow_headers(allowed_headers());

    if settings.allows_any_origin() {
        return cors.allow_origin(cors::Any);
    }

    let allowed_origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|s| match s.parse() {
            Ok(hv) => Some(hv),
            Err(e) => {
                error!("Invalid CORS origin configured: {} - Error: {}", s, e);
                None
            }
        })
        .collect();
    cors.allow_origin(allowed_origins)
}

/// Router with every layer the server runs with.
pub fn build_app(api_state: ApiContext) -> Router {
    let cors = cors_layer(&api_state.settings.api);
    let max_upload_bytes = api_state.settings.api.max_upload_bytes;

    create_router(api_state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn serve(
    pool: PgPool,
    vision: Arc<dyn VisionProvider>,
    settings: AppSettings,
) -> Result<()> {
    info!("🚀 Initializing server...");
    let addr: SocketAddr = format!("{}:{}", settings.api.host, settings.api.port)
        .parse()
        .map_err(|e| eyre!("Invalid address: {}", e))?;

    let api_state = ApiContext {
        pool,
        http_client: Client::new(),
        vision,
        settings,
    };
    let app = build_app(api_state);

    let listener = TcpListener::bind(addr).await?;
    info!("🚗 Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
