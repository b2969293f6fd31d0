pub mod alert;
pub mod analytics;
pub mod audit;
pub mod camera;
pub mod shared_video;
pub mod vehicle;
pub mod video_recording;
