use crate::{
    ApiSettings, CameraSettings, DashboardSettings, DatabaseSettings, LoggingSettings,
    RawSecretSettings, RawSettings, VisionSettings,
};
use color_eyre::eyre::{Report, eyre};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub vision: VisionSettings,
    pub cameras: CameraSettings,
    pub dashboard: DashboardSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub secrets: SecretSettings,
}

/// Validated secrets. Every field is guaranteed to be non-blank.
#[derive(Debug, Deserialize, Clone)]
pub struct SecretSettings {
    pub database_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
}

fn required(value: String, key: &str) -> Result<String, Report> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(eyre!("Missing required setting: secrets.{key}"));
    }
    Ok(value)
}

impl TryFrom<RawSecretSettings> for SecretSettings {
    type Error = Report;

    fn try_from(raw: RawSecretSettings) -> Result<Self, Self::Error> {
        Ok(Self {
            database_url: required(raw.database_url, "database_url")?,
            aws_access_key_id: required(raw.aws_access_key_id, "aws_access_key_id")?,
            aws_secret_access_key: required(raw.aws_secret_access_key, "aws_secret_access_key")?,
        })
    }
}

impl TryFrom<RawSettings> for AppSettings {
    type Error = Report;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        Ok(Self {
            api: raw.api,
            vision: raw.vision,
            cameras: raw.cameras,
            dashboard: raw.dashboard,
            database: raw.database,
            logging: raw.logging,
            secrets: raw.secrets.try_into()?,
        })
    }
}

impl LoggingSettings {
    /// Filter directive used when `RUST_LOG` is not set.
    #[must_use]
    pub fn default_directive(&self) -> String {
        let level = &self.level;
        format!(
            "api={level},common_services={level},vehicle_vision={level},app_state={level},tower_http=debug"
        )
    }
}

impl ApiSettings {
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o.trim() == "*")
    }
}
