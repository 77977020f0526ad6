use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_lambda::Client as LambdaClient;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{
    Environment, FunctionCode, InvocationType, LayerVersionContentInput, PackageType, Runtime,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::config::AppConfig;
use crate::core::models::{InvocationRequest, InvocationResponse};
use crate::errors::{InvokeError, TourError};
use crate::invoker::Invoke;

const IMAGE_FUNCTION_TIMEOUT_SECS: i32 = 30;
const IMAGE_FUNCTION_MEMORY_MB: i32 = 128;
const LIST_FUNCTIONS_MAX_ITEMS: i32 = 1000;
const LAYER_DESCRIPTION: &str = "Shared dependencies layer";

/// Thin wrapper over the Lambda API that keeps the state a walkthrough builds up
/// (the archive to deploy and the last published layer version).
pub struct LambdaFunction {
    client: LambdaClient,
    role_arn: Option<String>,
    runtime: Runtime,
    content_to_deploy: Option<Vec<u8>>,
    layer_version: Option<String>,
}

impl LambdaFunction {
    pub fn new(sdk_config: &SdkConfig, config: &AppConfig) -> Self {
        info!("Created AWS Lambda client");
        Self::from_client(LambdaClient::new(sdk_config), config)
    }

    pub fn from_client(client: LambdaClient, config: &AppConfig) -> Self {
        Self {
            client,
            role_arn: config.role_arn.clone(),
            runtime: Runtime::from(config.runtime.as_str()),
            content_to_deploy: None,
            layer_version: None,
        }
    }

    /// Capability used by the concurrent invoker.
    pub fn invoker(&self) -> LambdaInvoker {
        LambdaInvoker::new(self.client.clone())
    }

    pub async fn read_function(&mut self, archive: impl AsRef<Path>) -> Result<usize, TourError> {
        let archive = archive.as_ref();
        let bytes = tokio::fs::read(archive).await.map_err(|e| {
            TourError::IoError(format!("Failed to read {}: {e}", archive.display()))
        })?;
        info!(path = %archive.display(), size = bytes.len(), "Read deployment archive");
        let size = bytes.len();
        self.content_to_deploy = Some(bytes);
        Ok(size)
    }

    fn role_arn(&self) -> Result<&str, TourError> {
        self.role_arn
            .as_deref()
            .ok_or_else(|| TourError::ConfigError("LAMBDA_ROLE_ARN: not set".into()))
    }

    /// Creates a function from the archive loaded by [`Self::read_function`].
    pub async fn create_function_zip(
        &self,
        handler: &str,
        function_name: &str,
        timeout_secs: i32,
        environment: HashMap<String, String>,
    ) -> Result<String, TourError> {
        let content = self.content_to_deploy.as_ref().ok_or_else(|| {
            TourError::NotReady("No deployment archive loaded. Run read_function first.".into())
        })?;

        let output = self
            .client
            .create_function()
            .function_name(function_name)
            .runtime(self.runtime.clone())
            .role(self.role_arn()?)
            .handler(handler)
            .code(FunctionCode::builder().zip_file(Blob::new(content.clone())).build())
            .timeout(timeout_secs)
            .environment(Environment::builder().set_variables(Some(environment)).build())
            .send()
            .await?;

        let arn = output.function_arn().unwrap_or_default().to_string();
        info!(function_name, function_arn = %arn, "Created Lambda function from zip");
        Ok(arn)
    }

    pub async fn create_function_image(
        &self,
        function_name: &str,
        image_uri: &str,
    ) -> Result<String, TourError> {
        let output = self
            .client
            .create_function()
            .function_name(function_name)
            .package_type(PackageType::Image)
            .code(FunctionCode::builder().image_uri(image_uri).build())
            .role(self.role_arn()?)
            .timeout(IMAGE_FUNCTION_TIMEOUT_SECS)
            .memory_size(IMAGE_FUNCTION_MEMORY_MB)
            .send()
            .await?;

        let arn = output.function_arn().unwrap_or_default().to_string();
        info!(function_name, function_arn = %arn, image_uri, "Created Lambda function from image");
        Ok(arn)
    }

    pub async fn publish_layer(
        &mut self,
        layer_name: &str,
        package: impl AsRef<Path>,
    ) -> Result<String, TourError> {
        let package = package.as_ref();
        let zip = tokio::fs::read(package).await.map_err(|e| {
            TourError::IoError(format!("Failed to read {}: {e}", package.display()))
        })?;

        let output = self
            .client
            .publish_layer_version()
            .layer_name(layer_name)
            .description(LAYER_DESCRIPTION)
            .compatible_runtimes(self.runtime.clone())
            .content(LayerVersionContentInput::builder().zip_file(Blob::new(zip)).build())
            .send()
            .await?;

        let version_arn = output
            .layer_version_arn()
            .ok_or_else(|| TourError::AwsError("Layer published without a version ARN".into()))?
            .to_string();
        info!(
            layer_name,
            layer_arn = output.layer_arn().unwrap_or_default(),
            layer_version_arn = %version_arn,
            "Published layer version"
        );
        self.layer_version = Some(version_arn.clone());
        Ok(version_arn)
    }

    /// Appends the last published layer to the function's layer list.
    ///
    /// Reads the current configuration and writes it back without any guard, so
    /// two concurrent callers can overwrite each other's layer.
    pub async fn link_layer(&self, function_name: &str) -> Result<Vec<String>, TourError> {
        let layer_version = self.layer_version.clone().ok_or_else(|| {
            TourError::NotReady("Layer version not specified. Run publish_layer first.".into())
        })?;

        let current = self
            .client
            .get_function()
            .function_name(function_name)
            .send()
            .await?;
        let mut layers: Vec<String> = current
            .configuration()
            .map(|configuration| {
                configuration
                    .layers()
                    .iter()
                    .filter_map(|layer| layer.arn().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        debug!(function_name, existing = ?layers, "Existing layers");

        layers.push(layer_version);
        self.client
            .update_function_configuration()
            .function_name(function_name)
            .set_layers(Some(layers.clone()))
            .send()
            .await?;

        info!(function_name, layers = ?layers, "Linked layer to function");
        Ok(layers)
    }

    pub async fn set_concurrency_limit(
        &self,
        function_name: &str,
        concurrent_executions: i32,
    ) -> Result<Option<i32>, TourError> {
        let output = self
            .client
            .put_function_concurrency()
            .function_name(function_name)
            .reserved_concurrent_executions(concurrent_executions)
            .send()
            .await?;

        let reserved = output.reserved_concurrent_executions();
        info!(function_name, reserved = ?reserved, "Set reserved concurrent executions");
        Ok(reserved)
    }

    /// Synchronously invokes `function_name` once and returns the response body.
    pub async fn check_function(
        &self,
        function_name: &str,
        input: Option<&Value>,
    ) -> Result<String, TourError> {
        let mut request = InvocationRequest::new(function_name);
        if let Some(input) = input {
            request = request.with_payload(serde_json::to_vec(input)?);
        }

        let response = self
            .invoker()
            .invoke(request)
            .await
            .and_then(InvocationResponse::into_payload)
            .map_err(|e| TourError::AwsError(format!("Invoke {function_name} failed: {e}")))?;

        let text = String::from_utf8_lossy(&response).into_owned();
        info!(function_name, input = ?input, response = %text, "Invoked function");
        Ok(text)
    }

    pub async fn list_function_names(&self) -> Result<Vec<String>, TourError> {
        let output = self
            .client
            .list_functions()
            .max_items(LIST_FUNCTIONS_MAX_ITEMS)
            .send()
            .await?;

        let names: Vec<String> = output
            .functions()
            .iter()
            .filter_map(|function| function.function_name().map(str::to_string))
            .collect();
        info!(count = names.len(), names = ?names, "Listed Lambda functions");
        Ok(names)
    }

    pub async fn delete_function(&self, function_name: &str) -> Result<(), TourError> {
        self.client
            .delete_function()
            .function_name(function_name)
            .send()
            .await?;
        info!(function_name, "Deleted Lambda function");
        Ok(())
    }

    /// Deletes every version of `layer_name` compatible with the configured runtime.
    pub async fn delete_layer(&self, layer_name: &str) -> Result<usize, TourError> {
        let output = self
            .client
            .list_layer_versions()
            .compatible_runtime(self.runtime.clone())
            .layer_name(layer_name)
            .send()
            .await?;

        let versions = output.layer_versions();
        if versions.is_empty() {
            info!(layer_name, "No layer versions found");
            return Ok(0);
        }

        for version in versions {
            self.client
                .delete_layer_version()
                .layer_name(layer_name)
                .version_number(version.version())
                .send()
                .await?;
        }
        info!(layer_name, deleted = versions.len(), "Deleted all layer versions");
        Ok(versions.len())
    }

    /// Deletes the function and, when given, the layer. Both are attempted; the
    /// first error is returned.
    pub async fn cleanup(
        &self,
        function_name: &str,
        layer_name: Option<&str>,
    ) -> Result<(), TourError> {
        let function_result = self.delete_function(function_name).await;
        if let Err(e) = &function_result {
            warn!(function_name, error = %e, "Failed to delete function");
        }

        let layer_result = match layer_name {
            Some(layer_name) => self.delete_layer(layer_name).await.map(|_| ()),
            None => Ok(()),
        };
        if let Err(e) = &layer_result {
            warn!(layer_name = ?layer_name, error = %e, "Failed to delete layer");
        }

        function_result.and(layer_result)
    }
}

/// [`Invoke`] implementation backed by synchronous `RequestResponse` Lambda invocations.
#[derive(Clone)]
pub struct LambdaInvoker {
    client: LambdaClient,
}

impl LambdaInvoker {
    pub fn new(client: LambdaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Invoke for LambdaInvoker {
    async fn prepare(&self, target: &str, workers: usize) -> Result<(), InvokeError> {
        self.client
            .get_function()
            .function_name(target)
            .send()
            .await
            .map_err(|e| {
                InvokeError::Setup(format!(
                    "Cannot resolve function {target}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;
        debug!(function = target, workers, "Target function resolved");
        Ok(())
    }

    async fn invoke(&self, request: InvocationRequest) -> Result<InvocationResponse, InvokeError> {
        let output = self
            .client
            .invoke()
            .function_name(&request.target)
            .invocation_type(InvocationType::RequestResponse)
            .set_payload(request.payload.map(Blob::new))
            .send()
            .await
            .map_err(|e| InvokeError::Transport(DisplayErrorContext(&e).to_string()))?;

        Ok(InvocationResponse {
            status_code: output.status_code(),
            payload: output
                .payload()
                .map(|blob| blob.as_ref().to_vec())
                .unwrap_or_default(),
            function_error: output.function_error().map(str::to_string),
        })
    }
}
