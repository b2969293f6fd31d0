use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub api: ApiSettings,
    pub vision: VisionSettings,
    pub cameras: CameraSettings,
    pub dashboard: DashboardSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub secrets: RawSecretSettings,
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u32,
    /// `"*"` allows any origin.
    pub allowed_origins: Vec<String>,
    /// Upper bound for request bodies, raw image uploads included.
    pub max_upload_bytes: usize,
}

/// Options passed to the vision provider calls.
#[derive(Debug, Deserialize, Clone)]
pub struct VisionSettings {
    pub region: String,
    /// Percent, as the provider expects it.
    pub label_min_confidence: f32,
    pub max_labels: i32,
    /// Percent, as the provider expects it.
    pub moderation_min_confidence: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraSettings {
    /// Base ingest url handed to streaming software, the stream key gets appended to it.
    pub rtmp_server_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub recent_alerts_limit: i64,
}

/// Database connection pool configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub max_connections: u32,
    pub min_connection: u32,
    pub max_lifetime: u64,
    pub idle_timeout: u64,
    pub acquire_timeout: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Secrets as read from disk/env, may still be blank.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawSecretSettings {
    #[serde(default)]
    pub database_url: String,
    #[serde(default)]
    pub aws_access_key_id: String,
    #[serde(default)]
    pub aws_secret_access_key: String,
}
