use anyhow::Context;
use aws_tour::core::config::AppConfig;
use aws_tour::walkthrough::limits::{self, LimitsSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    aws_tour::setup_logging();

    let config = AppConfig::from_env()?;
    let mut settings = LimitsSettings::default();
    if let Ok(archive) = std::env::var("DEPLOY_ARCHIVE") {
        settings.archive = archive.into();
    }
    if let Ok(value) = std::env::var("NUM_EXECUTIONS") {
        settings.num_executions = value.parse().context("NUM_EXECUTIONS")?;
    }
    if let Ok(value) = std::env::var("CONCURRENCY_LIMIT") {
        settings.concurrency_limit = value.parse().context("CONCURRENCY_LIMIT")?;
    }

    limits::run(&config, &settings).await?;
    Ok(())
}
