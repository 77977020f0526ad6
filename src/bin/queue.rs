use aws_tour::core::config::AppConfig;
use aws_tour::walkthrough::queue::{self, QueueSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    aws_tour::setup_logging();

    let config = AppConfig::from_env()?;
    let mut settings = QueueSettings::default();
    if let Ok(message) = std::env::var("TOUR_MESSAGE") {
        settings.message = message;
    }

    queue::run(&config, &settings).await?;
    Ok(())
}
