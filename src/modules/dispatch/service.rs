use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::infrastructure::invoker::{InvokeError, Invoker};
use crate::infrastructure::queue::{QueueClient, QueueError, QueueMessage};

/// Most messages the queue hands out per receive call.
pub const MAX_BATCH_SIZE: i32 = 10;

/// No new batch starts with this much time or less left. It has to stay above
/// the slowest receive plus fan-out seen in production, since nothing
/// interrupts a batch once it has started.
pub const SAFETY_MARGIN: Duration = Duration::from_secs(20);

/// Time left before the runtime terminates the invocation.
pub trait TimeBudget: Send + Sync {
    fn remaining(&self) -> Duration;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DispatchOutcome {
    /// The queue is empty.
    Done,
    /// Out of time with work possibly left; the scheduler should run again.
    Pause,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Receive(#[from] QueueError),

    #[error("{failed} of {total} worker invocations failed, first error: {source}")]
    FanOut {
        failed: usize,
        total: usize,
        source: InvokeError,
    },
}

/// Drains the task queue into asynchronous worker invocations.
pub struct Dispatcher {
    queue: Arc<dyn QueueClient>,
    invoker: Arc<dyn Invoker>,
    worker_function: String,
}

impl Dispatcher {
    pub fn new(
        queue: Arc<dyn QueueClient>,
        invoker: Arc<dyn Invoker>,
        worker_function: impl Into<String>,
    ) -> Self {
        Self {
            queue,
            invoker,
            worker_function: worker_function.into(),
        }
    }

    #[instrument(skip_all, fields(worker = %self.worker_function))]
    pub async fn run(&self, budget: &dyn TimeBudget) -> Result<DispatchOutcome, DispatchError> {
        let mut batches = 0usize;
        let mut dispatched = 0usize;

        loop {
            let messages = self.queue.receive(MAX_BATCH_SIZE).await?;
            if messages.is_empty() {
                info!(batches, dispatched, "queue drained");
                return Ok(DispatchOutcome::Done);
            }

            self.fan_out(&messages).await?;
            batches += 1;
            dispatched += messages.len();

            let remaining = budget.remaining();
            if remaining <= SAFETY_MARGIN {
                info!(
                    batches,
                    dispatched,
                    remaining_ms = remaining.as_millis() as u64,
                    "pausing before time runs out"
                );
                return Ok(DispatchOutcome::Pause);
            }
            debug!(remaining_ms = remaining.as_millis() as u64, "next batch");
        }
    }

    /// Invoke one worker per message and wait until every call is accepted
    /// or rejected.
    async fn fan_out(&self, messages: &[QueueMessage]) -> Result<(), DispatchError> {
        let invocations = messages.iter().map(|message| self.invoke(message));
        let results = join_all(invocations).await;

        let total = results.len();
        let mut failures = results.into_iter().filter_map(Result::err);
        if let Some(source) = failures.next() {
            let failed = 1 + failures.count();
            error!(failed, total, "worker fan-out failed: {}", source);
            return Err(DispatchError::FanOut {
                failed,
                total,
                source,
            });
        }

        debug!(total, "batch dispatched");
        Ok(())
    }

    async fn invoke(&self, message: &QueueMessage) -> Result<(), InvokeError> {
        let payload = serde_json::to_vec(message).map_err(|e| InvokeError {
            target: self.worker_function.clone(),
            reason: format!("failed to encode message: {e}"),
        })?;
        self.invoker.invoke_async(&self.worker_function, payload).await
    }
}
