use std::time::{Duration, SystemTime, UNIX_EPOCH};

use lambda_runtime::{Context, Error, LambdaEvent};
use serde_json::Value;
use tracing::error;

use super::service::{DispatchOutcome, Dispatcher, TimeBudget};

/// Remaining time derived from the invocation deadline (epoch millis).
impl TimeBudget for Context {
    fn remaining(&self) -> Duration {
        remaining_until(self.deadline, SystemTime::now())
    }
}

fn remaining_until(deadline_ms: u64, now: SystemTime) -> Duration {
    (UNIX_EPOCH + Duration::from_millis(deadline_ms))
        .duration_since(now)
        .unwrap_or_default()
}

/// The trigger payload carries nothing the dispatcher needs.
pub async fn handle_event(dispatcher: &Dispatcher, event: LambdaEvent<Value>) -> Result<DispatchOutcome, Error> {
    dispatcher.run(&event.context).await.map_err(|e| {
        error!("❌ Dispatch cycle failed: {}", e);
        e.into()
    })
}
