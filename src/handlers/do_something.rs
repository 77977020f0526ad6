use std::env;
use std::time::Duration;

use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

pub use self::function_handler as handler;

/// Default simulated work per invocation. Long enough for a low reserved
/// concurrency limit to throttle a burst of calls.
pub const DEFAULT_WORK_MILLIS: u64 = 2_000;

pub fn work_duration() -> Duration {
    let millis = env::var("WORK_MILLIS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_WORK_MILLIS);
    Duration::from_millis(millis)
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkReport {
    pub message: String,
    pub request_id: String,
    pub worked_ms: u64,
    pub input: Value,
}

/// API-Gateway-shaped response returned by the "do something" function.
pub fn build_response(request_id: &str, input: &Value, worked: Duration) -> Value {
    let report = WorkReport {
        message: "Did something".to_string(),
        request_id: request_id.to_string(),
        worked_ms: millis(worked),
        input: input.clone(),
    };
    json!({
        "statusCode": 200,
        "body": json!(report).to_string(),
    })
}

#[tracing::instrument(level = "info", skip(event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let worked = work_duration();
    tokio::time::sleep(worked).await;
    info!(worked_ms = millis(worked), "Finished work");
    Ok(build_response(&event.context.request_id, &event.payload, worked))
}
