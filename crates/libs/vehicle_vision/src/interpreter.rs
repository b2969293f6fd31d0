use crate::{
    BoundingBox, DamageAssessment, DamageIndicator, DetectedLabel, InterpretError,
    ModerationLabel, TextDetection, TextKind, VehicleDetection, VehicleMeasurements,
    VisionAnalysis,
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static PLATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{5,8}$").expect("plate pattern is a valid regex"));

/// Label names that mark an image as containing a vehicle.
pub const VEHICLE_LABELS: &[&str] = &[
    "Car",
    "Automobile",
    "Vehicle",
    "Truck",
    "Van",
    "SUV",
    "Pickup Truck",
    "Sedan",
    "Coupe",
];

pub const UNKNOWN_VEHICLE_TYPE: &str = "Unknown";

const DAMAGE_KEYWORDS: &[&str] = &["damage", "broken", "accident"];

#[derive(Debug, Clone, PartialEq)]
pub struct PlateCandidate {
    pub text: String,
    pub confidence: f64,
    pub bounding_box: Option<BoundingBox>,
}

/// Turn raw provider output into a vehicle record.
///
/// The license plate is the only hard requirement, every other field falls back to a default.
pub fn interpret(analysis: &VisionAnalysis) -> Result<VehicleDetection, InterpretError> {
    let plate = find_plate(&analysis.text_detections).ok_or(InterpretError::NoPlateDetected)?;
    let vehicle_type = vehicle_type(&analysis.labels)
        .unwrap_or(UNKNOWN_VEHICLE_TYPE)
        .to_string();
    let measurements = vehicle_measurements(&analysis.labels);
    let damage = assess_damage(&analysis.moderation_labels);

    debug!(
        plate = %plate.text,
        confidence = plate.confidence,
        vehicle_type = %vehicle_type,
        damage_detected = damage.damage_detected,
        "Interpreted vision output"
    );

    Ok(VehicleDetection {
        license_plate: plate.text,
        confidence: plate.confidence,
        quality_score: plate.confidence,
        vehicle_type,
        plate_bounding_box: plate.bounding_box,
        measurements,
        damage,
    })
}

/// Strip all whitespace from a line of OCR output.
#[must_use]
pub fn normalize_plate_text(text: &str) -> String {
    text.split_whitespace().collect()
}

/// Pick the highest-confidence LINE that looks like a plate. Equal confidences keep the first one seen.
#[must_use]
pub fn find_plate(detections: &[TextDetection]) -> Option<PlateCandidate> {
    detections
        .iter()
        .filter(|d| d.kind == TextKind::Line && !d.text.trim().is_empty())
        .filter_map(|d| {
            let text = normalize_plate_text(&d.text);
            PLATE_PATTERN.is_match(&text).then(|| PlateCandidate {
                text,
                confidence: d.confidence,
                bounding_box: d.bounding_box,
            })
        })
        .fold(None, |best: Option<PlateCandidate>, candidate| match best {
            Some(best) if candidate.confidence <= best.confidence => Some(best),
            _ => Some(candidate),
        })
}

fn is_vehicle_label(label: &DetectedLabel) -> bool {
    VEHICLE_LABELS.contains(&label.name.as_str())
}

fn most_confident<'a>(labels: impl Iterator<Item = &'a DetectedLabel>) -> Option<&'a DetectedLabel> {
    labels.fold(None, |best: Option<&DetectedLabel>, label| match best {
        Some(best) if label.confidence <= best.confidence => Some(best),
        _ => Some(label),
    })
}

/// Name of the most confident allow-listed label, as the provider spelled it.
#[must_use]
pub fn vehicle_type(labels: &[DetectedLabel]) -> Option<&str> {
    most_confident(labels.iter().filter(|l| is_vehicle_label(l))).map(|l| l.name.as_str())
}

/// Measurements from the most confident vehicle label that has a usable bounding box.
#[must_use]
pub fn vehicle_measurements(labels: &[DetectedLabel]) -> Option<VehicleMeasurements> {
    let label = most_confident(labels.iter().filter(|l| {
        is_vehicle_label(l) && l.bounding_box.is_some_and(|b| b.height > 0.0)
    }))?;
    let bbox = label.bounding_box?;
    Some(VehicleMeasurements {
        width: bbox.width,
        height: bbox.height,
        aspect_ratio: bbox.width / bbox.height,
    })
}

/// Moderation labels reused as a damage heuristic.
#[must_use]
pub fn assess_damage(moderation_labels: &[ModerationLabel]) -> DamageAssessment {
    let damage_details: Vec<DamageIndicator> = moderation_labels
        .iter()
        .filter(|label| {
            let name = label.name.to_lowercase();
            DAMAGE_KEYWORDS.iter().any(|k| name.contains(k))
        })
        .map(|label| DamageIndicator {
            kind: label.name.clone(),
            confidence: label.confidence,
        })
        .collect();

    if damage_details.is_empty() {
        return DamageAssessment::default();
    }

    let damage_confidence = damage_details
        .iter()
        .map(|d| d.confidence)
        .fold(f64::MIN, f64::max);

    DamageAssessment {
        damage_detected: true,
        damage_confidence,
        damage_details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, confidence: f64) -> TextDetection {
        TextDetection {
            text: text.to_string(),
            kind: TextKind::Line,
            confidence,
            bounding_box: None,
        }
    }

    fn label(name: &str, confidence: f64) -> DetectedLabel {
        DetectedLabel {
            name: name.to_string(),
            confidence,
            bounding_box: None,
        }
    }

    fn analysis(text: Vec<TextDetection>, labels: Vec<DetectedLabel>) -> VisionAnalysis {
        VisionAnalysis {
            text_detections: text,
            labels,
            moderation_labels: vec![],
        }
    }

    #[test]
    fn plate_and_car_label_produce_record() {
        let result = interpret(&analysis(
            vec![line("ABC1234", 0.95)],
            vec![label("Car", 0.9)],
        ))
        .expect("plate should be found");

        assert_eq!(result.license_plate, "ABC1234");
        assert!((result.confidence - 0.95).abs() < f64::EPSILON);
        assert_eq!(result.vehicle_type, "Car");
        assert!(!result.damage.damage_detected);
        assert_eq!(result.measurements, None);
    }

    #[test]
    fn text_without_plate_fails() {
        let result = interpret(&analysis(vec![line("hello world", 0.99)], vec![]));
        assert_eq!(result, Err(InterpretError::NoPlateDetected));
    }

    #[test]
    fn empty_text_fails() {
        let result = interpret(&analysis(vec![], vec![label("Car", 0.99)]));
        assert_eq!(result, Err(InterpretError::NoPlateDetected));
    }

    #[test]
    fn words_are_not_plate_candidates() {
        let word = TextDetection {
            kind: TextKind::Word,
            ..line("ABC1234", 0.99)
        };
        assert_eq!(find_plate(&[word]), None);
    }

    #[test]
    fn internal_whitespace_is_removed() {
        let plate = find_plate(&[line("AB C 12 34", 0.8)]).expect("plate");
        assert_eq!(plate.text, "ABC1234");
    }

    #[test]
    fn pattern_is_strict() {
        assert_eq!(find_plate(&[line("abc1234", 0.9)]), None);
        assert_eq!(find_plate(&[line("ABCD", 0.9)]), None);
        assert_eq!(find_plate(&[line("ABCDE12345", 0.9)]), None);
        assert_eq!(find_plate(&[line("AB-1234", 0.9)]), None);
        assert!(find_plate(&[line("ABCDE", 0.9)]).is_some());
        assert!(find_plate(&[line("ABCD1234", 0.9)]).is_some());
    }

    #[test]
    fn highest_confidence_plate_wins() {
        let plate = find_plate(&[
            line("SPEED LIMIT 30", 0.99),
            line("XYZ987", 0.7),
            line("ABC1234", 0.92),
        ])
        .expect("plate");
        assert_eq!(plate.text, "ABC1234");
    }

    #[test]
    fn equal_confidence_keeps_first_seen() {
        let plate = find_plate(&[line("FIRST1", 0.9), line("SECOND2", 0.9)]).expect("plate");
        assert_eq!(plate.text, "FIRST1");
    }

    #[test]
    fn vehicle_type_is_most_confident_allowed_label() {
        let labels = vec![
            label("Person", 0.99),
            label("Vehicle", 0.85),
            label("Truck", 0.93),
            label("Car", 0.93),
        ];
        assert_eq!(vehicle_type(&labels), Some("Truck"));
    }

    #[test]
    fn vehicle_type_defaults_to_unknown() {
        let result = interpret(&analysis(
            vec![line("ABC1234", 0.95)],
            vec![label("Tree", 0.99), label("car", 0.9)],
        ))
        .expect("plate");
        assert_eq!(result.vehicle_type, UNKNOWN_VEHICLE_TYPE);
    }

    #[test]
    fn measurements_come_from_vehicle_bounding_box() {
        let boxed = DetectedLabel {
            bounding_box: Some(BoundingBox {
                width: 0.6,
                height: 0.3,
                left: 0.1,
                top: 0.2,
            }),
            ..label("Car", 0.9)
        };
        let flat = DetectedLabel {
            bounding_box: Some(BoundingBox {
                width: 0.5,
                height: 0.0,
                left: 0.0,
                top: 0.0,
            }),
            ..label("Van", 0.95)
        };
        let measurements = vehicle_measurements(&[flat, boxed]).expect("measurements");
        assert!((measurements.width - 0.6).abs() < 1e-9);
        assert!((measurements.aspect_ratio - 2.0).abs() < 1e-9);
    }

    #[test]
    fn damage_labels_set_flag_and_max_confidence() {
        let damage = assess_damage(&[
            ModerationLabel {
                name: "Vehicle Damage".to_string(),
                confidence: 0.85,
            },
            ModerationLabel {
                name: "Broken Glass".to_string(),
                confidence: 0.6,
            },
            ModerationLabel {
                name: "Violence".to_string(),
                confidence: 0.99,
            },
        ]);
        assert!(damage.damage_detected);
        assert!((damage.damage_confidence - 0.85).abs() < f64::EPSILON);
        assert_eq!(damage.damage_details.len(), 2);
        assert_eq!(damage.damage_details[0].kind, "Vehicle Damage");
    }

    #[test]
    fn no_damage_labels_give_default_assessment() {
        let damage = assess_damage(&[ModerationLabel {
            name: "Suggestive".to_string(),
            confidence: 0.9,
        }]);
        assert_eq!(damage, DamageAssessment::default());
    }

    #[test]
    fn interpretation_is_deterministic() {
        let input = VisionAnalysis {
            text_detections: vec![line("ABC1234", 0.95), line("XYZ789", 0.5)],
            labels: vec![label("Car", 0.9)],
            moderation_labels: vec![ModerationLabel {
                name: "Accident".to_string(),
                confidence: 0.7,
            }],
        };
        let first = serde_json::to_vec(&interpret(&input).expect("plate")).expect("json");
        let second = serde_json::to_vec(&interpret(&input).expect("plate")).expect("json");
        assert_eq!(first, second);
    }
}
