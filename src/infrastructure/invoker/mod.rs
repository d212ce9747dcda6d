pub mod lambda;

use async_trait::async_trait;
use thiserror::Error;

pub use lambda::LambdaInvoker;

#[derive(Debug, Error)]
#[error("failed to invoke {target}: {reason}")]
pub struct InvokeError {
    pub target: String,
    pub reason: String,
}

/// Fire-and-forget invocation of another function. `Ok` means the call was
/// accepted, not that it finished.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Invoker: Send + Sync {
    async fn invoke_async(&self, target: &str, payload: Vec<u8>) -> Result<(), InvokeError>;
}
