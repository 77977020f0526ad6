use std::borrow::Cow;

use crate::errors::InvokeError;

/// One call against a target. Built per invocation and consumed by the capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub target: String,
    pub payload: Option<Vec<u8>>,
}

impl InvocationRequest {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            payload: None,
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Raw response handed back by an invocation capability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationResponse {
    pub status_code: i32,
    pub payload: Vec<u8>,
    /// Set when the remote function ran but reported an error (e.g. `Unhandled`).
    pub function_error: Option<String>,
}

impl InvocationResponse {
    pub fn ok(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code: 200,
            payload: payload.into(),
            function_error: None,
        }
    }

    /// Collapses a remote error marker into an [`InvokeError::Remote`].
    pub fn into_payload(self) -> Result<Vec<u8>, InvokeError> {
        match self.function_error {
            Some(function_error) => Err(InvokeError::Remote {
                function_error,
                payload: String::from_utf8_lossy(&self.payload).into_owned(),
            }),
            None => Ok(self.payload),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    Succeeded(Vec<u8>),
    Failed(InvokeError),
}

/// Result of one invocation in a batch.
///
/// `index` is the submission index and is only meant for diagnostics: results
/// are yielded in completion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    pub index: usize,
    pub outcome: InvocationOutcome,
}

impl InvocationResult {
    pub fn succeeded(index: usize, payload: Vec<u8>) -> Self {
        Self {
            index,
            outcome: InvocationOutcome::Succeeded(payload),
        }
    }

    pub fn failed(index: usize, error: InvokeError) -> Self {
        Self {
            index,
            outcome: InvocationOutcome::Failed(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, InvocationOutcome::Succeeded(_))
    }

    pub fn payload(&self) -> Option<&[u8]> {
        match &self.outcome {
            InvocationOutcome::Succeeded(payload) => Some(payload),
            InvocationOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&InvokeError> {
        match &self.outcome {
            InvocationOutcome::Succeeded(_) => None,
            InvocationOutcome::Failed(error) => Some(error),
        }
    }

    /// Lossy UTF-8 rendering of a successful payload, for logging.
    pub fn payload_text(&self) -> Option<Cow<'_, str>> {
        self.payload().map(String::from_utf8_lossy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_with_function_error_becomes_remote_failure() {
        let response = InvocationResponse {
            status_code: 200,
            payload: br#"{"errorMessage":"boom"}"#.to_vec(),
            function_error: Some("Unhandled".to_string()),
        };

        match response.into_payload() {
            Err(InvokeError::Remote {
                function_error,
                payload,
            }) => {
                assert_eq!(function_error, "Unhandled");
                assert!(payload.contains("boom"));
            }
            other => panic!("expected remote failure, got {other:?}"),
        }
    }

    #[test]
    fn result_accessors_match_outcome() {
        let ok = InvocationResult::succeeded(0, b"hello".to_vec());
        assert!(ok.is_success());
        assert_eq!(ok.payload_text().as_deref(), Some("hello"));
        assert!(ok.error().is_none());

        let failed = InvocationResult::failed(1, InvokeError::Transport("reset".into()));
        assert!(!failed.is_success());
        assert!(failed.payload().is_none());
        assert_eq!(
            failed.error(),
            Some(&InvokeError::Transport("reset".into()))
        );
    }
}
