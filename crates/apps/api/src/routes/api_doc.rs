use crate::routes::{cameras, dashboard, detection, root};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        root::handlers::root,
        root::handlers::health_check,
        // Detection handlers
        detection::handlers::detect_from_url_handler,
        detection::handlers::detect_from_upload_handler,
        detection::handlers::detect_labels_handler,
        // Camera handlers
        cameras::handlers::list_cameras_handler,
        cameras::handlers::create_camera_handler,
        cameras::handlers::delete_camera_handler,
        cameras::handlers::toggle_status_handler,
        cameras::handlers::update_processor_handler,
        cameras::handlers::toggle_recording_handler,
        cameras::handlers::list_recordings_handler,
        cameras::handlers::share_recording_handler,
        cameras::handlers::open_shared_recording_handler,
        // Dashboard handlers
        dashboard::handlers::list_vehicles_handler,
        dashboard::handlers::list_alerts_handler,
        dashboard::handlers::list_analytics_handler,
        dashboard::handlers::daily_analytics_handler,
        dashboard::handlers::list_audits_handler,
    ),
    tags(
        (name = "System", description = "Liveness and readiness"),
        (name = "Detection", description = "License plate and vehicle detection from images"),
        (name = "Cameras", description = "Camera sources, recordings and share links"),
        (name = "Dashboard", description = "Vehicles, alerts, analytics and audits for the dashboard"),
    )
)]
pub struct ApiDoc;
