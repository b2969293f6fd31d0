use crate::{AppSettings, RawSettings};
use color_eyre::eyre::{Context, Result};
use config::builder::DefaultState;
use config::ConfigBuilder;
use std::path::Path;
use tracing::debug;

const SETTINGS_PATH: &str = "config/settings.yaml";

/// Load settings from `config/settings.yaml`, overridden by `APP__*` environment variables.
pub fn load_app_settings() -> Result<AppSettings> {
    load_app_settings_from(Path::new(SETTINGS_PATH))
}

pub fn load_app_settings_from(path: &Path) -> Result<AppSettings> {
    // Need to load from dotenv so the secrets can come from .env.
    dotenv::from_path(".env").ok();
    let config_path = path
        .canonicalize()
        .wrap_err_with(|| format!("Settings file not found: {}", path.display()))?;
    debug!("Loading settings from {}", config_path.display());

    let builder = config::Config::builder().add_source(config::File::from(config_path));
    build_settings(builder)
}

fn build_settings(builder: ConfigBuilder<DefaultState>) -> Result<AppSettings> {
    let raw_settings = builder
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize::<RawSettings>()?;

    raw_settings.try_into()
}
