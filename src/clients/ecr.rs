use aws_config::SdkConfig;
use aws_sdk_ecr::Client as EcrClient;
use aws_sdk_ecr::types::{ImageScanningConfiguration, ImageTagMutability};
use tracing::info;

use crate::errors::TourError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub arn: String,
    pub uri: String,
}

pub struct ContainerRegistry {
    client: EcrClient,
}

impl ContainerRegistry {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        info!("Created AWS Elastic Container Registry client");
        Self::from_client(EcrClient::new(sdk_config))
    }

    pub fn from_client(client: EcrClient) -> Self {
        Self { client }
    }

    /// Creates a repository with scan-on-push and mutable tags.
    pub async fn create_repository(&self, repository_name: &str) -> Result<Repository, TourError> {
        let output = self
            .client
            .create_repository()
            .repository_name(repository_name)
            .image_scanning_configuration(
                ImageScanningConfiguration::builder()
                    .scan_on_push(true)
                    .build(),
            )
            .image_tag_mutability(ImageTagMutability::Mutable)
            .send()
            .await?;

        let repository = output.repository().ok_or_else(|| {
            TourError::AwsError(format!("Repository {repository_name} missing from response"))
        })?;
        let created = Repository {
            arn: repository.repository_arn().unwrap_or_default().to_string(),
            uri: repository.repository_uri().unwrap_or_default().to_string(),
        };
        info!(
            repository_name,
            repository_arn = %created.arn,
            repository_uri = %created.uri,
            "Created ECR repository"
        );
        Ok(created)
    }

    /// Deletes every image in the repository, then the repository itself.
    pub async fn cleanup(&self, repository_name: &str) -> Result<(), TourError> {
        let images = self
            .client
            .list_images()
            .repository_name(repository_name)
            .send()
            .await?;

        let image_ids = images.image_ids().to_vec();
        if !image_ids.is_empty() {
            info!(repository_name, count = image_ids.len(), "Deleting repository images");
            self.client
                .batch_delete_image()
                .repository_name(repository_name)
                .set_image_ids(Some(image_ids))
                .send()
                .await?;
        }

        self.client
            .delete_repository()
            .repository_name(repository_name)
            .send()
            .await?;
        info!(repository_name, "Deleted ECR repository");
        Ok(())
    }
}
