use std::env;
use std::fmt;

use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_lambda::config::{Credentials, Region};

use crate::errors::TourError;

pub const DEFAULT_USERNAME: &str = "tour";
pub const DEFAULT_RUNTIME: &str = "provided.al2023";

#[derive(Clone)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` falls back to the default provider chain.
    pub credentials: Option<StaticCredentials>,
    pub region: String,
    pub role_arn: Option<String>,
    pub username: String,
    pub runtime: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, TourError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TourError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let credentials = match (get("AWS_ACCESS_KEY_ID"), get("AWS_SECRET_ACCESS_KEY")) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StaticCredentials {
                access_key_id,
                secret_access_key,
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(TourError::ConfigError(
                    "AWS_SECRET_ACCESS_KEY must be set together with AWS_ACCESS_KEY_ID".into(),
                ));
            }
            (None, Some(_)) => {
                return Err(TourError::ConfigError(
                    "AWS_ACCESS_KEY_ID must be set together with AWS_SECRET_ACCESS_KEY".into(),
                ));
            }
        };

        Ok(Self {
            credentials,
            region: get("AWS_REGION")
                .ok_or_else(|| TourError::ConfigError("AWS_REGION: not set".into()))?,
            role_arn: get("LAMBDA_ROLE_ARN"),
            username: get("TOUR_USERNAME").unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            runtime: get("LAMBDA_RUNTIME").unwrap_or_else(|| DEFAULT_RUNTIME.to_string()),
        })
    }

    pub fn require_role_arn(&self) -> Result<&str, TourError> {
        self.role_arn
            .as_deref()
            .ok_or_else(|| TourError::ConfigError("LAMBDA_ROLE_ARN: not set".into()))
    }

    /// Suffixes a resource name with the configured username so parallel users don't collide.
    pub fn resource_name(&self, base: &str) -> String {
        format!("{}_{}", base, self.username)
    }

    pub async fn sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()));
        if let Some(creds) = &self.credentials {
            loader = loader.credentials_provider(Credentials::new(
                creds.access_key_id.clone(),
                creds.secret_access_key.clone(),
                None,
                None,
                "aws-tour-env",
            ));
        }
        loader.load().await
    }
}
