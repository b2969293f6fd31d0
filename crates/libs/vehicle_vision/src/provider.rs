use crate::{VisionAnalysis, VisionError};
use async_trait::async_trait;

/// Image analysis backend. One call yields text, label and moderation output for a single image.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    async fn analyze(&self, image: &[u8]) -> Result<VisionAnalysis, VisionError>;
}
