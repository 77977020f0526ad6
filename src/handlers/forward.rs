use aws_sdk_sqs::Client as SqsClient;
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::errors::TourError;

pub use self::function_handler as handler;

pub const DESTINATION_ENV: &str = "DESTINATION_SQS_URL";

/// Message forwarded to the destination queue for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardedInvocation {
    pub source: String,
    pub request_id: String,
    pub input: Value,
}

pub fn destination_body(request_id: &str, input: &Value) -> Result<String, TourError> {
    let message = ForwardedInvocation {
        source: "lambda".to_string(),
        request_id: request_id.to_string(),
        input: input.clone(),
    };
    Ok(serde_json::to_string(&message)?)
}

pub async fn forward(
    client: &SqsClient,
    queue_url: &str,
    request_id: &str,
    input: &Value,
) -> Result<String, TourError> {
    let output = client
        .send_message()
        .queue_url(queue_url)
        .message_body(destination_body(request_id, input)?)
        .send()
        .await
        .map_err(|e| TourError::AwsError(format!("Failed to send message to SQS: {e}")))?;
    Ok(output.message_id().unwrap_or_default().to_string())
}

#[tracing::instrument(level = "info", skip(event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let queue_url = std::env::var(DESTINATION_ENV).map_err(|e| {
        error!("Config error: {DESTINATION_ENV}: {e}");
        Error::from(format!("{DESTINATION_ENV}: {e}"))
    })?;

    let shared_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let client = SqsClient::new(&shared_config);
    let message_id = forward(&client, &queue_url, &event.context.request_id, &event.payload)
        .await
        .map_err(|e| {
            error!("Forwarding failed: {e}");
            Error::from(e)
        })?;

    info!(message_id = %message_id, "Forwarded invocation to destination queue");
    Ok(json!({
        "statusCode": 200,
        "body": json!({ "message_id": message_id }).to_string(),
    }))
}
