use api::serve;
use app_state::load_app_settings;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use common_services::database::get_db_pool;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use vehicle_vision::RekognitionVision;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let settings = load_app_settings()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.logging.default_directive().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = get_db_pool(&settings).await?;
    let vision = RekognitionVision::builder()
        .access_key_id(settings.secrets.aws_access_key_id.clone())
        .secret_access_key(settings.secrets.aws_secret_access_key.clone())
        .region(settings.vision.region.clone())
        .label_min_confidence(settings.vision.label_min_confidence)
        .max_labels(settings.vision.max_labels)
        .moderation_min_confidence(settings.vision.moderation_min_confidence)
        .build()
        .map_err(|e| eyre!("Failed to set up the vision client: {e}"))?;

    serve(pool, Arc::new(vision), settings).await?;

    Ok(())
}
