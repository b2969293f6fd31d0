use crate::{
    BoundingBox, DetectedLabel, ModerationLabel, TextDetection, TextKind, VisionAnalysis,
    VisionError, VisionProvider,
};
use async_trait::async_trait;
use aws_sdk_rekognition::Client;
use aws_sdk_rekognition::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{self as rk, Image, TextTypes};
use bon::bon;
use tracing::{debug, info, instrument};

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_LABEL_MIN_CONFIDENCE: f32 = 80.0;
const DEFAULT_MAX_LABELS: i32 = 10;
const DEFAULT_MODERATION_MIN_CONFIDENCE: f32 = 60.0;

/// Amazon Rekognition backed [`VisionProvider`].
#[derive(Clone, Debug)]
pub struct RekognitionVision {
    client: Client,
    label_min_confidence: f32,
    max_labels: i32,
    moderation_min_confidence: f32,
}

#[bon]
impl RekognitionVision {
    #[builder]
    pub fn new(
        #[builder(into)] access_key_id: String,
        #[builder(into)] secret_access_key: String,
        #[builder(into)] region: Option<String>,
        label_min_confidence: Option<f32>,
        max_labels: Option<i32>,
        moderation_min_confidence: Option<f32>,
    ) -> Result<Self, VisionError> {
        if access_key_id.trim().is_empty() || secret_access_key.trim().is_empty() {
            return Err(VisionError::MissingCredentials);
        }
        let region = region.unwrap_or_else(|| DEFAULT_REGION.to_string());
        info!("Creating Rekognition client for region {region}");

        let credentials = Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "app_settings",
        );
        let config = aws_sdk_rekognition::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region))
            .credentials_provider(credentials)
            .build();

        Ok(Self {
            client: Client::from_conf(config),
            label_min_confidence: label_min_confidence.unwrap_or(DEFAULT_LABEL_MIN_CONFIDENCE),
            max_labels: max_labels.unwrap_or(DEFAULT_MAX_LABELS),
            moderation_min_confidence: moderation_min_confidence
                .unwrap_or(DEFAULT_MODERATION_MIN_CONFIDENCE),
        })
    }
}

fn provider_error(err: impl std::error::Error) -> VisionError {
    VisionError::Provider(DisplayErrorContext(err).to_string())
}

#[async_trait]
impl VisionProvider for RekognitionVision {
    #[instrument(skip(self, image), fields(image_len = image.len()), err(Debug))]
    async fn analyze(&self, image: &[u8]) -> Result<VisionAnalysis, VisionError> {
        if image.is_empty() {
            return Err(VisionError::EmptyImage);
        }
        let image = Image::builder().bytes(Blob::new(image.to_vec())).build();

        let text = self.client.detect_text().image(image.clone()).send();
        let labels = self
            .client
            .detect_labels()
            .image(image.clone())
            .min_confidence(self.label_min_confidence)
            .max_labels(self.max_labels)
            .send();
        let moderation = self
            .client
            .detect_moderation_labels()
            .image(image)
            .min_confidence(self.moderation_min_confidence)
            .send();

        let (text, labels, moderation) = tokio::try_join!(
            async { text.await.map_err(provider_error) },
            async { labels.await.map_err(provider_error) },
            async { moderation.await.map_err(provider_error) },
        )?;

        debug!(
            text = text.text_detections().len(),
            labels = labels.labels().len(),
            moderation = moderation.moderation_labels().len(),
            "Rekognition responses received"
        );

        Ok(to_analysis(
            text.text_detections(),
            labels.labels(),
            moderation.moderation_labels(),
        ))
    }
}

/// Provider confidences are percentages.
fn fraction(percent: Option<f32>) -> f64 {
    let value = f64::from(percent.unwrap_or(0.0)) / 100.0;
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn bounding_box(bbox: &rk::BoundingBox) -> Option<BoundingBox> {
    Some(BoundingBox {
        width: f64::from(bbox.width()?),
        height: f64::from(bbox.height()?),
        left: f64::from(bbox.left().unwrap_or_default()),
        top: f64::from(bbox.top().unwrap_or_default()),
    })
}

fn text_detection(detection: &rk::TextDetection) -> Option<TextDetection> {
    let kind = match detection.r#type()? {
        TextTypes::Line => TextKind::Line,
        TextTypes::Word => TextKind::Word,
        _ => return None,
    };
    Some(TextDetection {
        text: detection.detected_text()?.to_string(),
        kind,
        confidence: fraction(detection.confidence()),
        bounding_box: detection
            .geometry()
            .and_then(|g| g.bounding_box())
            .and_then(bounding_box),
    })
}

fn detected_label(label: &rk::Label) -> Option<DetectedLabel> {
    Some(DetectedLabel {
        name: label.name()?.to_string(),
        confidence: fraction(label.confidence()),
        bounding_box: label
            .instances()
            .iter()
            .find_map(|instance| instance.bounding_box().and_then(bounding_box)),
    })
}

fn moderation_label(label: &rk::ModerationLabel) -> Option<ModerationLabel> {
    Some(ModerationLabel {
        name: label.name()?.to_string(),
        confidence: fraction(label.confidence()),
    })
}

/// Convert Rekognition responses into our own structs, dropping entries that miss mandatory fields.
#[must_use]
pub fn to_analysis(
    text_detections: &[rk::TextDetection],
    labels: &[rk::Label],
    moderation_labels: &[rk::ModerationLabel],
) -> VisionAnalysis {
    VisionAnalysis {
        text_detections: text_detections.iter().filter_map(text_detection).collect(),
        labels: labels.iter().filter_map(detected_label).collect(),
        moderation_labels: moderation_labels
            .iter()
            .filter_map(moderation_label)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_rekognition::types::{Geometry, Instance};

    #[test]
    fn converts_provider_output() {
        let text = vec![
            rk::TextDetection::builder()
                .detected_text("ABC 1234")
                .r#type(TextTypes::Line)
                .confidence(95.0)
                .geometry(
                    Geometry::builder()
                        .bounding_box(
                            rk::BoundingBox::builder()
                                .width(0.2)
                                .height(0.1)
                                .left(0.4)
                                .top(0.8)
                                .build(),
                        )
                        .build(),
                )
                .build(),
            // Missing type, must be dropped.
            rk::TextDetection::builder().detected_text("ZZZ999").build(),
        ];
        let labels = vec![
            rk::Label::builder()
                .name("Car")
                .confidence(90.0)
                .instances(
                    Instance::builder()
                        .bounding_box(
                            rk::BoundingBox::builder()
                                .width(0.5)
                                .height(0.25)
                                .left(0.1)
                                .top(0.1)
                                .build(),
                        )
                        .build(),
                )
                .build(),
            rk::Label::builder().confidence(99.0).build(),
        ];
        let moderation = vec![
            rk::ModerationLabel::builder()
                .name("Vehicle Damage")
                .confidence(85.0)
                .build(),
        ];

        let analysis = to_analysis(&text, &labels, &moderation);

        assert_eq!(analysis.text_detections.len(), 1);
        let line = &analysis.text_detections[0];
        assert_eq!(line.kind, TextKind::Line);
        assert!((line.confidence - 0.95).abs() < 1e-6);
        assert!(line.bounding_box.is_some());

        assert_eq!(analysis.labels.len(), 1);
        let car = &analysis.labels[0];
        assert_eq!(car.name, "Car");
        assert!((car.bounding_box.expect("instance box").height - 0.25).abs() < 1e-6);

        assert!((analysis.moderation_labels[0].confidence - 0.85).abs() < 1e-6);
    }

    #[test]
    fn blank_credentials_are_rejected() {
        let result = RekognitionVision::builder()
            .access_key_id("")
            .secret_access_key("secret")
            .build();
        assert!(matches!(result, Err(VisionError::MissingCredentials)));
    }

    #[test]
    fn confidence_is_clamped() {
        assert!((fraction(Some(150.0)) - 1.0).abs() < f64::EPSILON);
        assert!(fraction(None).abs() < f64::EPSILON);
        assert!(fraction(Some(f32::NAN)).abs() < f64::EPSILON);
    }
}
