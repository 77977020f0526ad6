use std::collections::HashMap;

use futures::Stream;
use tokio::task::{Id, JoinSet};
use tracing::{Span, error, info, warn};

use crate::core::models::InvocationResult;
use crate::errors::InvokeError;

/// In-flight invocations of one batch, yielded in completion order.
///
/// Dropping a batch before it is drained detaches the outstanding workers;
/// they still run to completion, their results are discarded.
pub struct Batch {
    workers: JoinSet<InvocationResult>,
    indices: HashMap<Id, usize>,
    span: Span,
}

impl Batch {
    pub(super) fn new(
        workers: JoinSet<InvocationResult>,
        indices: HashMap<Id, usize>,
        span: Span,
    ) -> Self {
        Self {
            workers,
            indices,
            span,
        }
    }

    pub(super) fn empty(span: Span) -> Self {
        Self::new(JoinSet::new(), HashMap::new(), span)
    }

    /// Number of invocations that have not been yielded yet.
    pub fn remaining(&self) -> usize {
        self.workers.len()
    }

    pub fn is_drained(&self) -> bool {
        self.workers.is_empty()
    }

    /// Waits for the next invocation to finish. `None` once every result was yielded.
    pub async fn next(&mut self) -> Option<InvocationResult> {
        let result = match self.workers.join_next_with_id().await? {
            Ok((id, result)) => {
                self.indices.remove(&id);
                result
            }
            Err(join_error) => {
                // Panicked or cancelled worker: attribute it to its submission slot.
                let index = match self.indices.remove(&join_error.id()) {
                    Some(index) => index,
                    None => {
                        debug_assert!(false, "worker {} has no submission index", join_error.id());
                        error!(
                            parent: &self.span,
                            worker = %join_error.id(),
                            "Worker has no submission index"
                        );
                        usize::MAX
                    }
                };
                InvocationResult::failed(index, InvokeError::Worker(join_error.to_string()))
            }
        };

        match result.error() {
            None => info!(parent: &self.span, index = result.index, "Invocation succeeded"),
            Some(error) => {
                warn!(parent: &self.span, index = result.index, %error, "Invocation failed")
            }
        }
        Some(result)
    }

    /// Joins every worker and returns the results in completion order.
    pub async fn collect(mut self) -> Vec<InvocationResult> {
        let mut results = Vec::with_capacity(self.remaining());
        while let Some(result) = self.next().await {
            results.push(result);
        }
        results
    }

    pub fn into_stream(self) -> impl Stream<Item = InvocationResult> + Send {
        futures::stream::unfold(self, |mut batch| async move {
            batch.next().await.map(|result| (result, batch))
        })
    }
}

impl Drop for Batch {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            warn!(
                parent: &self.span,
                outstanding = self.workers.len(),
                "Batch dropped before draining, detaching workers"
            );
            self.workers.detach_all();
        }
    }
}
