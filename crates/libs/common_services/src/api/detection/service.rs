use crate::api::detection::error::DetectionError;
use crate::api::detection::interfaces::{
    DetectionRequest, DetectionResponse, FrameLabelsResponse,
};
use crate::database::alert::{AlertSeverity, NewAlert};
use crate::database::analytics::{NewAnalyticsEvent, VEHICLE_DETECTED_EVENT};
use crate::database::{AlertStore, AnalyticsStore, CameraStore, VehicleStore};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::json;
use sqlx::PgPool;
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::{info, instrument};
use url::{Host, Url};
use uuid::Uuid;
use vehicle_vision::{VehicleDetection, VisionProvider, interpret};

pub const DAMAGE_ALERT_TYPE: &str = "damage_detected";
const DAMAGE_EVENT_TYPE: &str = "suspicious_vehicle";
const HIGH_SEVERITY_CONFIDENCE: f64 = 0.8;

/// Image urls must be absolute http(s) urls on a public host.
pub fn validate_image_url(image_url: Option<&str>) -> Result<Url, DetectionError> {
    let raw = image_url.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(DetectionError::InvalidInput("image_url is required".to_string()));
    }
    let url = Url::parse(raw)
        .map_err(|e| DetectionError::InvalidInput(format!("image_url is not a valid url: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DetectionError::InvalidInput(format!(
            "image_url must use http or https, got {}",
            url.scheme()
        )));
    }
    let public = match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain != "localhost" && !domain.ends_with(".localhost")
        }
        Some(Host::Ipv4(ip)) => is_public_ipv4(ip),
        Some(Host::Ipv6(ip)) => is_public_ipv6(ip),
        None => false,
    };
    if !public {
        return Err(DetectionError::InvalidInput(
            "image_url must point to a public host".to_string(),
        ));
    }
    Ok(url)
}

fn is_public_ipv4(ip: Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    // 100.64.0.0/10 is carrier-grade NAT space.
    let shared = a == 100 && (b & 0xc0) == 64;
    !(ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || ip.is_documentation()
        || shared)
}

fn is_public_ipv6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_public_ipv4(v4);
    }
    let first = ip.segments()[0];
    let unique_local = (first & 0xfe00) == 0xfc00;
    let link_local = (first & 0xffc0) == 0xfe80;
    !(ip.is_loopback() || ip.is_unspecified() || unique_local || link_local)
}

fn image_too_large(url: &Url, max_bytes: usize) -> DetectionError {
    DetectionError::InvalidInput(format!("Image at {url} exceeds the {max_bytes} byte limit"))
}

/// Fetch an image, refusing bodies larger than `max_bytes`.
///
/// A declared `Content-Length` over the limit fails before any body is read.
#[instrument(skip(http_client), err(Debug))]
pub async fn download_image(
    http_client: &Client,
    url: &Url,
    max_bytes: usize,
) -> Result<Vec<u8>, DetectionError> {
    let mut response = http_client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| DetectionError::ImageDownload(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DetectionError::ImageDownload(format!(
            "{url} responded with {status}"
        )));
    }

    if let Some(declared) = response.content_length() {
        if declared > max_bytes as u64 {
            return Err(image_too_large(url, max_bytes));
        }
    }

    let mut image = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| DetectionError::ImageDownload(e.to_string()))?
    {
        if image.len() + chunk.len() > max_bytes {
            return Err(image_too_large(url, max_bytes));
        }
        image.extend_from_slice(&chunk);
    }

    if image.is_empty() {
        return Err(DetectionError::InvalidInput(format!("Image at {url} is empty")));
    }
    info!("Downloaded {} bytes from {url}", image.len());
    Ok(image)
}

/// Download the image behind `request.image_url`, then analyse and record it.
#[instrument(skip(pool, http_client, vision), err(Debug))]
pub async fn process_image_url(
    pool: &PgPool,
    http_client: &Client,
    vision: &dyn VisionProvider,
    request: DetectionRequest,
    max_image_bytes: usize,
) -> Result<DetectionResponse, DetectionError> {
    let image_url = validate_image_url(request.image_url.as_deref())?;
    ensure_camera_exists(pool, request.camera_id).await?;
    info!("Processing image from url: {image_url}");

    let image = download_image(http_client, &image_url, max_image_bytes).await?;
    analyze_and_record(pool, vision, &image, request.camera_id, Some(image_url.as_str())).await
}

/// Labels seen in a single live frame. No plate is required and nothing is stored.
#[instrument(skip(vision, image), fields(image_len = image.len()), err(Debug))]
pub async fn analyze_frame_labels(
    vision: &dyn VisionProvider,
    image: &[u8],
) -> Result<FrameLabelsResponse, DetectionError> {
    if image.is_empty() {
        return Err(DetectionError::InvalidInput("Image body is empty".to_string()));
    }
    let analysis = vision.analyze(image).await?;
    Ok(FrameLabelsResponse {
        labels: analysis.labels,
    })
}

/// Analyse image bytes and record the vehicle they show.
///
/// Nothing is written when no plate is found.
#[instrument(skip(pool, vision, image), fields(image_len = image.len()), err(Debug))]
pub async fn process_image_bytes(
    pool: &PgPool,
    vision: &dyn VisionProvider,
    image: &[u8],
    camera_id: Option<Uuid>,
    image_url: Option<&str>,
) -> Result<DetectionResponse, DetectionError> {
    if image.is_empty() {
        return Err(DetectionError::InvalidInput("Image body is empty".to_string()));
    }
    ensure_camera_exists(pool, camera_id).await?;
    analyze_and_record(pool, vision, image, camera_id, image_url).await
}

async fn analyze_and_record(
    pool: &PgPool,
    vision: &dyn VisionProvider,
    image: &[u8],
    camera_id: Option<Uuid>,
    image_url: Option<&str>,
) -> Result<DetectionResponse, DetectionError> {
    let analysis = vision.analyze(image).await?;
    info!(
        text = analysis.text_detections.len(),
        labels = analysis.labels.len(),
        moderation = analysis.moderation_labels.len(),
        "Analysis completed, processing results"
    );
    let detection = interpret(&analysis)?;

    record_detection(pool, detection, camera_id, image_url, Utc::now()).await
}

async fn ensure_camera_exists(pool: &PgPool, camera_id: Option<Uuid>) -> Result<(), DetectionError> {
    let Some(camera_id) = camera_id else {
        return Ok(());
    };
    if CameraStore::find_by_id(pool, camera_id).await?.is_none() {
        return Err(DetectionError::InvalidInput(format!(
            "Unknown camera_id: {camera_id}"
        )));
    }
    Ok(())
}

/// Upsert the vehicle, then add the analytics event and damage alert it calls for.
///
/// The writes are independent: a failed alert insert leaves the vehicle row in place.
#[instrument(skip(pool, detection), fields(plate = %detection.license_plate), err(Debug))]
pub async fn record_detection(
    pool: &PgPool,
    detection: VehicleDetection,
    camera_id: Option<Uuid>,
    image_url: Option<&str>,
    seen_at: DateTime<Utc>,
) -> Result<DetectionResponse, DetectionError> {
    let upserted = VehicleStore::upsert_detection(pool, &detection, image_url, seen_at).await?;
    let vehicle = upserted.vehicle;

    if upserted.inserted {
        let event = vehicle_detected_event(vehicle.id, camera_id, &detection);
        AnalyticsStore::create(pool, &event).await?;
    }

    let alert_id = match damage_alert(vehicle.id, camera_id, &detection)? {
        Some(alert) => Some(AlertStore::create(pool, &alert).await?.id),
        None => None,
    };

    let message = if upserted.inserted {
        "Vehicle processed successfully"
    } else {
        "Vehicle updated successfully"
    };
    info!(vehicle_id = %vehicle.id, new = upserted.inserted, "{message}");

    Ok(DetectionResponse {
        success: true,
        message: message.to_string(),
        vehicle_id: vehicle.id,
        is_new_vehicle: upserted.inserted,
        alert_id,
        vehicle,
        detection,
    })
}

#[must_use]
pub fn vehicle_detected_event(
    vehicle_id: Uuid,
    camera_id: Option<Uuid>,
    detection: &VehicleDetection,
) -> NewAnalyticsEvent {
    NewAnalyticsEvent {
        event_type: VEHICLE_DETECTED_EVENT.to_string(),
        camera_id,
        vehicle_id: Some(vehicle_id),
        event_data: Some(json!({
            "license_plate": detection.license_plate,
            "damage_detected": detection.damage.damage_detected,
            "vehicle_type": detection.vehicle_type,
        })),
    }
}

/// One alert per detection that shows damage.
pub fn damage_alert(
    vehicle_id: Uuid,
    camera_id: Option<Uuid>,
    detection: &VehicleDetection,
) -> Result<Option<NewAlert>, serde_json::Error> {
    let damage = &detection.damage;
    if !damage.damage_detected {
        return Ok(None);
    }
    let severity = if damage.damage_confidence > HIGH_SEVERITY_CONFIDENCE {
        AlertSeverity::High
    } else {
        AlertSeverity::Medium
    };

    Ok(Some(NewAlert {
        vehicle_id: Some(vehicle_id),
        camera_id,
        alert_type: DAMAGE_ALERT_TYPE.to_string(),
        event_type: Some(DAMAGE_EVENT_TYPE.to_string()),
        severity,
        message: format!("Vehicle damage detected on {}", detection.license_plate),
        confidence: Some(damage.damage_confidence),
        event_metadata: Some(serde_json::to_value(damage)?),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vehicle_vision::{DamageAssessment, DamageIndicator};

    fn detection(damage: DamageAssessment) -> VehicleDetection {
        VehicleDetection {
            license_plate: "ABC1234".to_string(),
            confidence: 0.95,
            quality_score: 0.95,
            vehicle_type: "Car".to_string(),
            plate_bounding_box: None,
            measurements: None,
            damage,
        }
    }

    fn damaged(confidence: f64) -> DamageAssessment {
        DamageAssessment {
            damage_detected: true,
            damage_confidence: confidence,
            damage_details: vec![DamageIndicator {
                kind: "Vehicle Damage".to_string(),
                confidence,
            }],
        }
    }

    #[test]
    fn image_url_must_be_present_and_http() {
        assert!(matches!(
            validate_image_url(None),
            Err(DetectionError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_image_url(Some("   ")),
            Err(DetectionError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_image_url(Some("not a url")),
            Err(DetectionError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_image_url(Some("ftp://host/car.jpg")),
            Err(DetectionError::InvalidInput(_))
        ));
        let url = validate_image_url(Some(" https://cdn.example.com/car.jpg ")).expect("valid");
        assert_eq!(url.as_str(), "https://cdn.example.com/car.jpg");
    }

    #[test]
    fn image_url_must_point_to_public_host() {
        for internal in [
            "http://127.0.0.1/car.jpg",
            "http://localhost:8080/car.jpg",
            "http://cams.localhost/car.jpg",
            "http://169.254.169.254/latest/meta-data/",
            "http://10.0.0.5/car.jpg",
            "http://192.168.1.20/car.jpg",
            "http://100.64.1.1/car.jpg",
            "http://0.0.0.0/car.jpg",
            "http://[::1]/car.jpg",
            "http://[fd00::1]/car.jpg",
            "http://[fe80::1]/car.jpg",
            "http://[::ffff:127.0.0.1]/car.jpg",
        ] {
            assert!(
                matches!(
                    validate_image_url(Some(internal)),
                    Err(DetectionError::InvalidInput(_))
                ),
                "{internal} should be rejected"
            );
        }
        assert!(validate_image_url(Some("https://8.8.8.8/car.jpg")).is_ok());
        assert!(validate_image_url(Some("https://[2606:4700::1111]/car.jpg")).is_ok());
    }

    /// Serve a single canned response on a local port.
    async fn serve_once(head: &'static str, body_len: usize) -> Url {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = [0_u8; 2048];
            let _ = socket.read(&mut request).await;
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(&vec![7_u8; body_len]).await;
            let _ = socket.shutdown().await;
        });
        Url::parse(&format!("http://{addr}/car.jpg")).expect("url")
    }

    fn local_client() -> Client {
        Client::builder().no_proxy().build().expect("client")
    }

    #[tokio::test]
    async fn download_refuses_declared_oversized_image() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nContent-Length: 4096\r\n\r\n",
            4096,
        )
        .await;
        let result = download_image(&local_client(), &url, 1024).await;
        assert!(matches!(result, Err(DetectionError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn download_refuses_streamed_oversized_image() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nConnection: close\r\n\r\n",
            4096,
        )
        .await;
        let result = download_image(&local_client(), &url, 1024).await;
        assert!(matches!(result, Err(DetectionError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn download_returns_image_within_limit() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nContent-Length: 512\r\n\r\n",
            512,
        )
        .await;
        let image = download_image(&local_client(), &url, 1024)
            .await
            .expect("image within limit");
        assert_eq!(image.len(), 512);
    }

    #[tokio::test]
    async fn download_failure_status_is_a_server_error() {
        let url = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n",
            0,
        )
        .await;
        let result = download_image(&local_client(), &url, 1024).await;
        assert!(matches!(result, Err(DetectionError::ImageDownload(_))));
    }

    #[test]
    fn damage_creates_alert_with_severity() {
        let vehicle_id = Uuid::new_v4();
        let alert = damage_alert(vehicle_id, None, &detection(damaged(0.85)))
            .expect("serializable")
            .expect("alert for damage");
        assert_eq!(alert.severity, AlertSeverity::High);
        assert_eq!(alert.vehicle_id, Some(vehicle_id));
        assert_eq!(alert.alert_type, DAMAGE_ALERT_TYPE);
        assert_eq!(alert.confidence, Some(0.85));
        assert_eq!(alert.message, "Vehicle damage detected on ABC1234");

        let medium = damage_alert(vehicle_id, None, &detection(damaged(0.8)))
            .expect("serializable")
            .expect("alert for damage");
        assert_eq!(medium.severity, AlertSeverity::Medium);
    }

    #[test]
    fn no_damage_no_alert() {
        let alert = damage_alert(Uuid::new_v4(), None, &detection(DamageAssessment::default()))
            .expect("serializable");
        assert_eq!(alert, None);
    }

    #[test]
    fn analytics_event_describes_vehicle() {
        let vehicle_id = Uuid::new_v4();
        let camera_id = Uuid::new_v4();
        let event = vehicle_detected_event(vehicle_id, Some(camera_id), &detection(damaged(0.5)));
        assert_eq!(event.event_type, VEHICLE_DETECTED_EVENT);
        assert_eq!(event.camera_id, Some(camera_id));
        let data = event.event_data.expect("event data");
        assert_eq!(data["license_plate"], "ABC1234");
        assert_eq!(data["damage_detected"], true);
        assert_eq!(data["vehicle_type"], "Car");
    }

    async fn count(pool: &PgPool, sql: &str, vehicle_id: Uuid) -> Result<i64, DetectionError> {
        Ok(sqlx::query_scalar::<_, i64>(sql)
            .bind(vehicle_id)
            .fetch_one(pool)
            .await?)
    }

    #[sqlx::test]
    #[ignore = "requires a postgres DATABASE_URL"]
    async fn repeated_damaged_detection_writes_one_event_and_an_alert_each(
        pool: PgPool,
    ) -> Result<(), DetectionError> {
        let first_seen = Utc::now();
        let first = record_detection(
            &pool,
            detection(damaged(0.9)),
            None,
            Some("https://img/1.jpg"),
            first_seen,
        )
        .await?;
        assert!(first.is_new_vehicle);
        assert_eq!(first.message, "Vehicle processed successfully");
        let first_alert = first.alert_id.expect("alert for damaged vehicle");

        let second = record_detection(
            &pool,
            detection(damaged(0.6)),
            None,
            None,
            first_seen + chrono::Duration::minutes(1),
        )
        .await?;
        assert!(!second.is_new_vehicle);
        assert_eq!(second.vehicle_id, first.vehicle_id);
        assert_eq!(second.message, "Vehicle updated successfully");
        let second_alert = second.alert_id.expect("alert for damaged vehicle");
        assert_ne!(second_alert, first_alert);

        let events = count(
            &pool,
            "SELECT COUNT(*) FROM analytics WHERE vehicle_id = $1 AND event_type = 'vehicle_detected'",
            first.vehicle_id,
        )
        .await?;
        assert_eq!(events, 1);

        let alerts = count(
            &pool,
            "SELECT COUNT(*) FROM alerts WHERE vehicle_id = $1 AND alert_type = 'damage_detected'",
            first.vehicle_id,
        )
        .await?;
        assert_eq!(alerts, 2);
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requires a postgres DATABASE_URL"]
    async fn undamaged_detection_writes_no_alert(pool: PgPool) -> Result<(), DetectionError> {
        let mut clean = detection(DamageAssessment::default());
        clean.license_plate = "CLEAN42".to_string();

        let response = record_detection(&pool, clean, None, None, Utc::now()).await?;
        assert!(response.is_new_vehicle);
        assert_eq!(response.alert_id, None);

        let alerts = count(
            &pool,
            "SELECT COUNT(*) FROM alerts WHERE vehicle_id = $1",
            response.vehicle_id,
        )
        .await?;
        assert_eq!(alerts, 0);
        Ok(())
    }
}
