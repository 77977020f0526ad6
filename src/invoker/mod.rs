//! Concurrent fan-out of identical invocations against one target.
//!
//! [`ConcurrentInvoker::dispatch`] spawns one tokio task per requested
//! invocation into a [`tokio::task::JoinSet`] and hands back a [`Batch`] that
//! yields results as they complete. A failing invocation is recorded in its
//! result and never disturbs its siblings; only setup failures abort a batch.

mod batch;
mod capability;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

use crate::core::models::{InvocationRequest, InvocationResponse, InvocationResult};
use crate::errors::BatchError;

pub use batch::Batch;
pub use capability::Invoke;

#[derive(Clone)]
pub struct ConcurrentInvoker {
    capability: Arc<dyn Invoke>,
}

impl ConcurrentInvoker {
    pub fn new<I: Invoke>(capability: I) -> Self {
        Self {
            capability: Arc::new(capability),
        }
    }

    /// Dispatches `count` invocations of `target`, each carrying a copy of `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::EmptyTarget`] for a blank target and
    /// [`BatchError::Setup`] when the capability fails to prepare. In both
    /// cases nothing has been dispatched.
    pub async fn dispatch(
        &self,
        target: &str,
        count: usize,
        payload: Option<Vec<u8>>,
    ) -> Result<Batch, BatchError> {
        if target.trim().is_empty() {
            return Err(BatchError::EmptyTarget);
        }

        let batch_id = Uuid::new_v4();
        let span = info_span!("batch", %batch_id, function = target, count);

        if count == 0 {
            debug!(parent: &span, "Empty batch requested, nothing to dispatch");
            return Ok(Batch::empty(span));
        }

        self.capability
            .prepare(target, count)
            .instrument(span.clone())
            .await
            .map_err(|e| {
                error!(parent: &span, error = %e, "Batch setup failed");
                BatchError::Setup(e)
            })?;

        let mut workers = JoinSet::new();
        let mut indices = HashMap::with_capacity(count);
        for index in 0..count {
            let capability = Arc::clone(&self.capability);
            let request = InvocationRequest {
                target: target.to_string(),
                payload: payload.clone(),
            };
            let worker_span = info_span!(parent: &span, "invocation", index);
            let handle = workers.spawn(
                async move {
                    match capability
                        .invoke(request)
                        .await
                        .and_then(InvocationResponse::into_payload)
                    {
                        Ok(payload) => InvocationResult::succeeded(index, payload),
                        Err(e) => InvocationResult::failed(index, e),
                    }
                }
                .instrument(worker_span),
            );
            indices.insert(handle.id(), index);
        }

        info!(parent: &span, "Dispatched {} invocations", count);
        Ok(Batch::new(workers, indices, span))
    }

    /// Dispatches and drains a batch in one go.
    pub async fn run(
        &self,
        target: &str,
        count: usize,
        payload: Option<Vec<u8>>,
    ) -> Result<Vec<InvocationResult>, BatchError> {
        Ok(self.dispatch(target, count, payload).await?.collect().await)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::errors::InvokeError;

    struct Echo {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Invoke for Echo {
        async fn invoke(
            &self,
            request: InvocationRequest,
        ) -> Result<InvocationResponse, InvokeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(InvocationResponse::ok(request.payload.unwrap_or_default()))
        }
    }

    struct Panics;

    #[async_trait]
    impl Invoke for Panics {
        async fn invoke(&self, _: InvocationRequest) -> Result<InvocationResponse, InvokeError> {
            panic!("worker blew up");
        }
    }

    struct Slow {
        finished: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Invoke for Slow {
        async fn invoke(&self, _: InvocationRequest) -> Result<InvocationResponse, InvokeError> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            Ok(InvocationResponse::ok("done"))
        }
    }

    #[tokio::test]
    async fn rejects_blank_target_without_calling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let invoker = ConcurrentInvoker::new(Echo {
            calls: Arc::clone(&calls),
        });

        let err = invoker.dispatch("  ", 3, None).await.err();
        assert!(matches!(err, Some(BatchError::EmptyTarget)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn payload_is_copied_to_every_invocation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let invoker = ConcurrentInvoker::new(Echo {
            calls: Arc::clone(&calls),
        });

        let results = invoker
            .run("echo", 3, Some(b"{\"n\":1}".to_vec()))
            .await
            .expect("batch should dispatch");

        assert_eq!(results.len(), 3);
        assert!(
            results
                .iter()
                .all(|r| r.payload() == Some(b"{\"n\":1}".as_slice()))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn panicking_worker_becomes_failed_result() {
        let invoker = ConcurrentInvoker::new(Panics);
        let results = invoker.run("boom", 2, None).await.expect("batch should dispatch");

        assert_eq!(results.len(), 2);
        let mut indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1]);
        assert!(
            results
                .iter()
                .all(|r| matches!(r.error(), Some(InvokeError::Worker(_))))
        );
    }

    #[tokio::test]
    async fn dropped_batch_lets_workers_finish() {
        let finished = Arc::new(AtomicUsize::new(0));
        let invoker = ConcurrentInvoker::new(Slow {
            finished: Arc::clone(&finished),
        });

        let batch = invoker.dispatch("slow", 3, None).await.expect("batch should dispatch");
        assert_eq!(batch.remaining(), 3);
        drop(batch);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 3);
    }
}
