// Lambda entry point for the "do something" function used by tour-limits.

use lambda_runtime::{Error, run, service_fn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    aws_tour::setup_logging();
    run(service_fn(aws_tour::handlers::do_something::handler)).await
}
