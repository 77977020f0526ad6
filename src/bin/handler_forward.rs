// Lambda entry point for the queue-forwarding function used by tour-destination.

use lambda_runtime::{Error, run, service_fn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    aws_tour::setup_logging();
    run(service_fn(aws_tour::handlers::forward::handler)).await
}
