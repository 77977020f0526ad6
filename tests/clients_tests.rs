use std::collections::HashMap;

use aws_tour::clients::{LambdaFunction, Queue};
use aws_tour::core::config::AppConfig;
use aws_tour::errors::TourError;

async fn region_only_config() -> (AppConfig, aws_config::SdkConfig) {
    let config = AppConfig::from_lookup(|key: &str| {
        (key == "AWS_REGION").then(|| "us-east-1".to_string())
    })
    .expect("config");
    let sdk_config = config.sdk_config().await;
    (config, sdk_config)
}

fn assert_not_ready<T: std::fmt::Debug>(result: Result<T, TourError>, expected: &str) {
    match result {
        Err(TourError::NotReady(msg)) => assert!(msg.contains(expected), "message: {msg}"),
        other => panic!("expected NotReady, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_function_zip_requires_archive() {
    let (config, sdk_config) = region_only_config().await;
    let lambda = LambdaFunction::new(&sdk_config, &config);

    let result = lambda
        .create_function_zip("bootstrap", "fn_tour", 15, HashMap::new())
        .await;
    assert_not_ready(result, "No deployment archive loaded");
}

#[tokio::test]
async fn test_link_layer_requires_published_layer() {
    let (config, sdk_config) = region_only_config().await;
    let lambda = LambdaFunction::new(&sdk_config, &config);

    assert_not_ready(lambda.link_layer("fn_tour").await, "Layer version not specified");
}

#[tokio::test]
async fn test_missing_archive_and_layer_package_are_io_errors() {
    let (config, sdk_config) = region_only_config().await;
    let mut lambda = LambdaFunction::new(&sdk_config, &config);

    let read = lambda.read_function("does/not/exist.zip").await;
    assert!(matches!(read, Err(TourError::IoError(msg)) if msg.contains("does/not/exist.zip")));

    let publish = lambda.publish_layer("layer_tour", "does/not/exist.zip").await;
    assert!(matches!(publish, Err(TourError::IoError(_))));

    // nothing was loaded, so deployment is still refused
    let create = lambda
        .create_function_zip("bootstrap", "fn_tour", 15, HashMap::new())
        .await;
    assert_not_ready(create, "No deployment archive loaded");
}

#[tokio::test]
async fn test_queue_operations_require_created_queue() {
    let (_, sdk_config) = region_only_config().await;
    let mut queue = Queue::new(&sdk_config);

    assert!(queue.queue_url().is_none());
    assert_not_ready(queue.queue_stats().await, "No queue created");
    assert_not_ready(queue.send_message("hello").await, "No queue created");
    assert_not_ready(queue.read_messages(1).await, "No queue created");

    // cleanup without a queue is a no-op
    assert!(queue.cleanup().await.is_ok());
    assert!(queue.queue_url().is_none());
}
