use anyhow::Context;
use aws_tour::core::config::AppConfig;
use aws_tour::walkthrough::container::{self, ContainerSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    aws_tour::setup_logging();

    let config = AppConfig::from_env()?;
    let image_uri = std::env::var("IMAGE_URI").context("IMAGE_URI must point at a pushed image")?;

    container::run(&config, &ContainerSettings::new(image_uri)).await?;
    Ok(())
}
