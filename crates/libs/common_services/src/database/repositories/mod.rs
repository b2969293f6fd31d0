mod alert_store;
mod analytics_store;
mod audit_store;
mod camera_store;
mod recording_store;
mod shared_video_store;
mod vehicle_store;

pub use alert_store::*;
pub use analytics_store::*;
pub use audit_store::*;
pub use camera_store::*;
pub use recording_store::*;
pub use shared_video_store::*;
pub use vehicle_store::*;
