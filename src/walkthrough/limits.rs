use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::clients::LambdaFunction;
use crate::core::config::AppConfig;
use crate::core::models::InvocationResult;
use crate::errors::TourError;
use crate::invoker::ConcurrentInvoker;

use super::finish;

#[derive(Debug, Clone)]
pub struct LimitsSettings {
    pub archive: PathBuf,
    pub handler: String,
    pub function_base: String,
    pub timeout_secs: i32,
    pub concurrency_limit: i32,
    /// Raise above `concurrency_limit` to see throttled invocations.
    pub num_executions: usize,
    pub deploy_wait: Duration,
}

impl Default for LimitsSettings {
    fn default() -> Self {
        Self {
            archive: PathBuf::from("target/lambda/tour-handler-proc/bootstrap.zip"),
            handler: "bootstrap".to_string(),
            function_base: "do_something_concurrent".to_string(),
            timeout_secs: 15,
            concurrency_limit: 2,
            num_executions: 2,
            deploy_wait: Duration::from_secs(1),
        }
    }
}

/// Invokes `function_name` `num_executions` times at once and logs each response
/// as it arrives.
pub async fn multiple_simultaneous_calls(
    invoker: &ConcurrentInvoker,
    function_name: &str,
    num_executions: usize,
) -> Result<Vec<InvocationResult>, TourError> {
    info!(function_name, num_executions, "Calling function concurrently");

    let mut batch = invoker.dispatch(function_name, num_executions, None).await?;
    let mut results = Vec::with_capacity(num_executions);
    while let Some(result) = batch.next().await {
        match (result.payload_text(), result.error()) {
            (Some(text), _) => info!(index = result.index, response = %text, "Response"),
            (None, Some(error)) => warn!(index = result.index, %error, "Invocation failed"),
            (None, None) => {}
        }
        results.push(result);
    }

    let failed = results.iter().filter(|r| !r.is_success()).count();
    info!(succeeded = results.len() - failed, failed, "Concurrent calls finished");
    Ok(results)
}

pub async fn run(config: &AppConfig, settings: &LimitsSettings) -> Result<(), TourError> {
    let sdk_config = config.sdk_config().await;
    let mut lambda = LambdaFunction::new(&sdk_config, config);
    let function_name = config.resource_name(&settings.function_base);

    let mut function_created = false;
    let steps = async {
        lambda.read_function(&settings.archive).await?;
        lambda
            .create_function_zip(
                &settings.handler,
                &function_name,
                settings.timeout_secs,
                HashMap::new(),
            )
            .await?;
        function_created = true;

        tokio::time::sleep(settings.deploy_wait).await;

        lambda.check_function(&function_name, None).await?;
        lambda.list_function_names().await?;
        lambda
            .set_concurrency_limit(&function_name, settings.concurrency_limit)
            .await?;

        let invoker = ConcurrentInvoker::new(lambda.invoker());
        multiple_simultaneous_calls(&invoker, &function_name, settings.num_executions).await?;
        Ok::<_, TourError>(())
    }
    .await;

    let mut cleanups = Vec::new();
    if function_created {
        cleanups.push(lambda.cleanup(&function_name, None).await);
    }
    finish("limits", steps, cleanups)
}
