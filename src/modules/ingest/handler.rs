use lambda_runtime::{Error, LambdaEvent};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::model::Submission;
use super::service::JobSubmitter;
use crate::infrastructure::queue::QueueMessage;

pub const SKIPPED: &str = "SKIPPED";

pub async fn handle_event(submitter: &JobSubmitter, event: LambdaEvent<Value>) -> Result<String, Error> {
    process(submitter, event.payload).await
}

/// Resolves to the created flow id, or [`SKIPPED`] for non-video objects.
pub async fn process(submitter: &JobSubmitter, payload: Value) -> Result<String, Error> {
    info!("Event {}", payload);
    let message = read_message(payload);

    match submitter.handle(&message).await {
        Ok(Submission::Created(flow)) => Ok(flow.0),
        Ok(Submission::Skipped { .. }) => Ok(SKIPPED.to_string()),
        Err(e) => {
            error!("❌ Failed to submit job: {}", e);
            Err(e.into())
        }
    }
}

/// Decodes the invocation payload. A field of the wrong type only loses that
/// field, so a usable body still reaches the parser.
fn read_message(payload: Value) -> QueueMessage {
    match QueueMessage::deserialize(&payload) {
        Ok(message) => message,
        Err(e) => {
            warn!("Event is not a well-formed queue message: {}", e);
            let text = |field: &str| payload.get(field).and_then(Value::as_str).map(str::to_owned);
            QueueMessage {
                message_id: text("MessageId"),
                receipt_handle: text("ReceiptHandle"),
                body: payload.get("Body").cloned(),
            }
        }
    }
}
