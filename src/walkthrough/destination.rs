use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::clients::{LambdaFunction, Queue};
use crate::core::config::AppConfig;
use crate::errors::TourError;
use crate::handlers::forward::DESTINATION_ENV;

use super::finish;

#[derive(Debug, Clone)]
pub struct DestinationSettings {
    pub archive: PathBuf,
    pub handler: String,
    pub function_base: String,
    pub queue_base: String,
    pub timeout_secs: i32,
    pub invocations: usize,
    pub deploy_wait: Duration,
    /// Time given to forwarded messages to land in (and leave) the queue.
    pub settle_wait: Duration,
}

impl Default for DestinationSettings {
    fn default() -> Self {
        Self {
            archive: PathBuf::from("target/lambda/tour-handler-forward/bootstrap.zip"),
            handler: "bootstrap".to_string(),
            function_base: "sqs_lambda".to_string(),
            queue_base: "lambda_destination_queue".to_string(),
            timeout_secs: 15,
            invocations: 3,
            deploy_wait: Duration::from_secs(1),
            settle_wait: Duration::from_secs(10),
        }
    }
}

/// Deploys the forwarding function against a fresh queue, invokes it and
/// checks that the messages show up.
pub async fn run(config: &AppConfig, settings: &DestinationSettings) -> Result<(), TourError> {
    let sdk_config = config.sdk_config().await;
    let mut queue = Queue::new(&sdk_config);
    let mut lambda = LambdaFunction::new(&sdk_config, config);
    let queue_name = config.resource_name(&settings.queue_base);
    let function_name = config.resource_name(&settings.function_base);

    let mut function_created = false;
    let steps = async {
        let queue_url = queue.create_queue(&queue_name).await?;
        queue.queue_stats().await?;

        lambda.read_function(&settings.archive).await?;
        let environment = HashMap::from([(DESTINATION_ENV.to_string(), queue_url)]);
        lambda
            .create_function_zip(
                &settings.handler,
                &function_name,
                settings.timeout_secs,
                environment,
            )
            .await?;
        function_created = true;

        tokio::time::sleep(settings.deploy_wait).await;

        for _ in 0..settings.invocations {
            lambda.check_function(&function_name, None).await?;
        }

        tokio::time::sleep(settings.settle_wait).await;

        let stats = queue.queue_stats().await?;
        info!(visible = stats.visible, "Messages waiting after invocations");
        for _ in 0..settings.invocations {
            queue.read_messages(1).await?;
        }

        tokio::time::sleep(settings.settle_wait).await;
        queue.queue_stats().await?;
        Ok::<_, TourError>(())
    }
    .await;

    let mut cleanups = Vec::new();
    if function_created {
        cleanups.push(lambda.cleanup(&function_name, None).await);
    }
    cleanups.push(queue.cleanup().await);
    finish("destination", steps, cleanups)
}
