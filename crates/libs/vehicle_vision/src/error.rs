use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Vision API credentials are not configured")]
    MissingCredentials,

    #[error("Image is empty")]
    EmptyImage,

    #[error("Vision API request failed: {0}")]
    Provider(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpretError {
    #[error("No license plate detected in image")]
    NoPlateDetected,
}
