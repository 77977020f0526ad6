//! Scripted tours over the service wrappers.
//!
//! Every tour runs its steps, then its cleanup, whatever the steps returned.
//! Errors are logged as they happen and the first one is handed back.

pub mod container;
pub mod destination;
pub mod limits;
pub mod queue;

use tracing::{error, info};

use crate::errors::TourError;

/// Combines the step result with every cleanup result. Step errors win over
/// cleanup errors; cleanup errors are reported in order.
pub fn finish(
    tour: &str,
    steps: Result<(), TourError>,
    cleanups: impl IntoIterator<Item = Result<(), TourError>>,
) -> Result<(), TourError> {
    if let Err(e) = &steps {
        error!(tour, error = %e, "Tour step failed");
    }

    let mut first_cleanup_error = None;
    for cleanup in cleanups {
        if let Err(e) = cleanup {
            error!(tour, error = %e, "Cleanup failed");
            first_cleanup_error.get_or_insert(e);
        }
    }

    steps?;
    match first_cleanup_error {
        Some(e) => Err(e),
        None => {
            info!(tour, "Tour finished");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_error_takes_precedence() {
        let result = finish(
            "test",
            Err(TourError::NotReady("step".into())),
            [Err(TourError::AwsError("cleanup".into()))],
        );
        assert!(matches!(result, Err(TourError::NotReady(msg)) if msg == "step"));
    }

    #[test]
    fn first_cleanup_error_is_reported() {
        let result = finish(
            "test",
            Ok(()),
            [
                Ok(()),
                Err(TourError::AwsError("first".into())),
                Err(TourError::AwsError("second".into())),
            ],
        );
        assert!(matches!(result, Err(TourError::AwsError(msg)) if msg == "first"));
    }

    #[test]
    fn clean_run_is_ok() {
        assert!(finish("test", Ok(()), [Ok(()), Ok(())]).is_ok());
    }
}
