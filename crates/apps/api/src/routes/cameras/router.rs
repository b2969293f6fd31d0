use crate::api_state::ApiContext;
use crate::cameras::handlers::{
    create_camera_handler, delete_camera_handler, list_cameras_handler, list_recordings_handler,
    open_shared_recording_handler, share_recording_handler, toggle_recording_handler,
    toggle_status_handler, update_processor_handler,
};
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

pub fn cameras_router() -> Router<ApiContext> {
    Router::new()
        .route(
            "/cameras",
            get(list_cameras_handler).post(create_camera_handler),
        )
        .route("/cameras/{camera_id}", delete(delete_camera_handler))
        .route("/cameras/{camera_id}/status", post(toggle_status_handler))
        .route(
            "/cameras/{camera_id}/processor",
            patch(update_processor_handler),
        )
        .route(
            "/cameras/{camera_id}/recording",
            post(toggle_recording_handler),
        )
        .route(
            "/cameras/{camera_id}/recordings",
            get(list_recordings_handler),
        )
        .route("/cameras/{camera_id}/share", post(share_recording_handler))
        .route("/shared/{share_token}", get(open_shared_recording_handler))
}
