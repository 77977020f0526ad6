use std::collections::HashMap;

use aws_tour::core::config::{AppConfig, DEFAULT_RUNTIME, DEFAULT_USERNAME};
use aws_tour::errors::TourError;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn test_minimal_config_uses_defaults() {
    let config = AppConfig::from_lookup(lookup(&[("AWS_REGION", "us-east-1")])).expect("config");

    assert_eq!(config.region, "us-east-1");
    assert!(config.credentials.is_none());
    assert!(config.role_arn.is_none());
    assert_eq!(config.username, DEFAULT_USERNAME);
    assert_eq!(config.runtime, DEFAULT_RUNTIME);
    assert!(matches!(config.require_role_arn(), Err(TourError::ConfigError(_))));
}

#[test]
fn test_full_config() {
    let config = AppConfig::from_lookup(lookup(&[
        ("AWS_REGION", "sa-east-1"),
        ("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE"),
        ("AWS_SECRET_ACCESS_KEY", "secret"),
        ("LAMBDA_ROLE_ARN", "arn:aws:iam::123456789012:role/lambda"),
        ("TOUR_USERNAME", "alice"),
        ("LAMBDA_RUNTIME", "python3.12"),
    ]))
    .expect("config");

    let creds = config.credentials.as_ref().expect("static credentials");
    assert_eq!(creds.access_key_id, "AKIDEXAMPLE");
    assert_eq!(
        config.require_role_arn().expect("role"),
        "arn:aws:iam::123456789012:role/lambda"
    );
    assert_eq!(config.resource_name("message_queue"), "message_queue_alice");
    assert_eq!(config.runtime, "python3.12");
}

#[test]
fn test_missing_region_is_reported() {
    let err = AppConfig::from_lookup(lookup(&[])).expect_err("region is required");
    assert_eq!(err.to_string(), "Invalid configuration: AWS_REGION: not set");
}

#[test]
fn test_blank_values_count_as_unset() {
    let err = AppConfig::from_lookup(lookup(&[("AWS_REGION", "  ")])).expect_err("blank region");
    assert!(matches!(err, TourError::ConfigError(_)));
}

#[test]
fn test_half_configured_credentials_are_rejected() {
    let err = AppConfig::from_lookup(lookup(&[
        ("AWS_REGION", "us-east-1"),
        ("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE"),
    ]))
    .expect_err("secret key missing");
    assert!(err.to_string().contains("AWS_SECRET_ACCESS_KEY"));
}

#[test]
fn test_debug_output_redacts_secret() {
    let config = AppConfig::from_lookup(lookup(&[
        ("AWS_REGION", "us-east-1"),
        ("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE"),
        ("AWS_SECRET_ACCESS_KEY", "super-secret-value"),
    ]))
    .expect("config");

    let rendered = format!("{config:?}");
    assert!(rendered.contains("AKIDEXAMPLE"));
    assert!(!rendered.contains("super-secret-value"));
}
