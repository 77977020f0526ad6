use aws_sdk_lambda::error::{DisplayErrorContext, SdkError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TourError {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Failed to interact with AWS services: {0}")]
    AwsError(String),

    #[error("Failed to access local file: {0}")]
    IoError(String),

    #[error("Resource not ready: {0}")]
    NotReady(String),

    #[error("Failed to serialize payload: {0}")]
    SerializationError(String),

    #[error(transparent)]
    Batch(#[from] BatchError),
}

/// Failure of a single invocation. Carried inside an
/// [`InvocationResult`](crate::core::models::InvocationResult) as data,
/// never raised past the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    #[error("Invocation transport failed: {0}")]
    Transport(String),

    #[error("Function reported {function_error}: {payload}")]
    Remote {
        function_error: String,
        payload: String,
    },

    #[error("Invocation worker failed: {0}")]
    Worker(String),

    #[error("Invocation setup failed: {0}")]
    Setup(String),
}

/// Failure that aborts a whole batch before anything is dispatched.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Invocation target must not be empty")]
    EmptyTarget,

    #[error("Failed to set up invocation workers: {0}")]
    Setup(#[source] InvokeError),
}

impl From<std::io::Error> for TourError {
    fn from(error: std::io::Error) -> Self {
        TourError::IoError(error.to_string())
    }
}

impl From<serde_json::Error> for TourError {
    fn from(error: serde_json::Error) -> Self {
        TourError::SerializationError(error.to_string())
    }
}

impl From<anyhow::Error> for TourError {
    fn from(error: anyhow::Error) -> Self {
        TourError::AwsError(error.to_string())
    }
}

// Every aws-sdk-* crate re-exports the same smithy SdkError, so one impl covers
// Lambda, SQS and ECR.
impl<E, R> From<SdkError<E, R>> for TourError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    fn from(error: SdkError<E, R>) -> Self {
        TourError::AwsError(DisplayErrorContext(&error).to_string())
    }
}
