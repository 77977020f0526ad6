use std::time::Duration;

use aws_tour::core::config::AppConfig;
use aws_tour::errors::TourError;
use aws_tour::walkthrough::limits::{self, LimitsSettings};

fn offline_config() -> AppConfig {
    AppConfig::from_lookup(|key: &str| match key {
        "AWS_REGION" => Some("us-east-1".to_string()),
        "AWS_ACCESS_KEY_ID" => Some("AKIDEXAMPLE".to_string()),
        "AWS_SECRET_ACCESS_KEY" => Some("secret".to_string()),
        _ => None,
    })
    .expect("config")
}

#[tokio::test]
async fn test_limits_with_missing_archive_skips_function_cleanup() {
    let settings = LimitsSettings {
        archive: "does/not/exist.zip".into(),
        ..LimitsSettings::default()
    };

    // No function was created, so no AWS call is made at all.
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        limits::run(&offline_config(), &settings),
    )
    .await
    .expect("tour should stop without reaching AWS");

    assert!(matches!(result, Err(TourError::IoError(msg)) if msg.contains("does/not/exist.zip")));
}
