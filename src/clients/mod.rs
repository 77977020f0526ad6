//! Service wrappers. Each one owns its SDK client; build them all from the
//! same [`aws_config::SdkConfig`].

pub mod ecr;
pub mod lambda;
pub mod sqs;

pub use ecr::ContainerRegistry;
pub use lambda::{LambdaFunction, LambdaInvoker};
pub use sqs::Queue;
