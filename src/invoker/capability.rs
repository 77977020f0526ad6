use async_trait::async_trait;

use crate::core::models::{InvocationRequest, InvocationResponse};
use crate::errors::InvokeError;

/// Something that can invoke a named remote function.
///
/// The networked implementation is [`LambdaInvoker`](crate::clients::lambda::LambdaInvoker);
/// tests plug in stubs.
#[async_trait]
pub trait Invoke: Send + Sync + 'static {
    /// Runs once per non-empty batch, before any worker is spawned.
    /// An error here aborts the whole batch.
    async fn prepare(&self, _target: &str, _workers: usize) -> Result<(), InvokeError> {
        Ok(())
    }

    async fn invoke(&self, request: InvocationRequest) -> Result<InvocationResponse, InvokeError>;
}
