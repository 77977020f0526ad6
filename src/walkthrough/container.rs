use std::time::Duration;

use crate::clients::{ContainerRegistry, LambdaFunction};
use crate::core::config::AppConfig;
use crate::errors::TourError;

use super::finish;

#[derive(Debug, Clone)]
pub struct ContainerSettings {
    pub repository_base: String,
    pub function_base: String,
    /// Image already pushed to a registry the function role can pull from.
    pub image_uri: String,
    pub deploy_wait: Duration,
}

impl ContainerSettings {
    pub fn new(image_uri: impl Into<String>) -> Self {
        Self {
            repository_base: "tour_repository".to_string(),
            function_base: "container_lambda".to_string(),
            image_uri: image_uri.into(),
            deploy_wait: Duration::from_secs(5),
        }
    }
}

/// Creates a repository and a function backed by a container image, checks the
/// function, then removes both.
pub async fn run(config: &AppConfig, settings: &ContainerSettings) -> Result<(), TourError> {
    let sdk_config = config.sdk_config().await;
    let registry = ContainerRegistry::new(&sdk_config);
    let lambda = LambdaFunction::new(&sdk_config, config);
    let repository_name = config.resource_name(&settings.repository_base).replace('_', "-");
    let function_name = config.resource_name(&settings.function_base);

    let mut repository_created = false;
    let mut function_created = false;
    let steps = async {
        registry.create_repository(&repository_name).await?;
        repository_created = true;

        lambda
            .create_function_image(&function_name, &settings.image_uri)
            .await?;
        function_created = true;

        tokio::time::sleep(settings.deploy_wait).await;
        lambda.check_function(&function_name, None).await?;
        Ok::<_, TourError>(())
    }
    .await;

    let mut cleanups = Vec::new();
    if function_created {
        cleanups.push(lambda.cleanup(&function_name, None).await);
    }
    if repository_created {
        cleanups.push(registry.cleanup(&repository_name).await);
    }
    finish("container", steps, cleanups)
}
