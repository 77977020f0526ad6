/// aws-tour - walkthroughs over AWS Lambda, SQS and ECR built on the Rust AWS SDK.
///
/// The crate is organised around one reusable piece, the [`invoker`], which fans
/// out a batch of identical Lambda invocations and yields results as they
/// complete. The rest wraps the SDK clients and sequences the tours:
///
/// - [`clients`] owns one SDK client per service (Lambda, SQS, ECR)
/// - [`walkthrough`] runs create / exercise / cleanup sequences
/// - [`handlers`] are the Lambda functions the tours deploy
///
/// # Example
///
/// ```no_run
/// use aws_tour::clients::LambdaFunction;
/// use aws_tour::core::config::AppConfig;
/// use aws_tour::invoker::ConcurrentInvoker;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     aws_tour::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let sdk_config = config.sdk_config().await;
///     let lambda = LambdaFunction::new(&sdk_config, &config);
///
///     let invoker = ConcurrentInvoker::new(lambda.invoker());
///     let mut batch = invoker.dispatch("do_something_concurrent_tour", 4, None).await?;
///     while let Some(result) = batch.next().await {
///         println!("{}: {:?}", result.index, result.payload_text());
///     }
///     Ok(())
/// }
/// ```
pub mod clients;
pub mod core;
pub mod errors;
pub mod handlers;
pub mod invoker;
pub mod walkthrough;

pub use errors::{BatchError, InvokeError, TourError};

/// Configure structured logging with JSON format.
///
/// Honors `RUST_LOG`, defaulting to `info`. Safe to call more than once; only the
/// first call installs the subscriber.
///
/// # Example
///
/// ```
/// aws_tour::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
