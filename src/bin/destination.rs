use aws_tour::core::config::AppConfig;
use aws_tour::walkthrough::destination::{self, DestinationSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    aws_tour::setup_logging();

    let config = AppConfig::from_env()?;
    let mut settings = DestinationSettings::default();
    if let Ok(archive) = std::env::var("DEPLOY_ARCHIVE") {
        settings.archive = archive.into();
    }

    destination::run(&config, &settings).await?;
    Ok(())
}
