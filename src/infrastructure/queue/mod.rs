pub mod sqs;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use sqs::SqsQueue;

/// One message as delivered by the task queue. Serialized with the SQS field
/// names so the worker accepts both dispatched payloads and raw SQS messages.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueueMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_handle: Option<String>,
    /// Usually a JSON document encoded as a string.
    #[serde(default)]
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("failed to receive messages: {0}")]
    Receive(String),

    #[error("failed to delete message: {0}")]
    Delete(String),

    #[error("queue url is not configured")]
    NotConfigured,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Receive up to `max_messages` messages in a single call.
    async fn receive(&self, max_messages: i32) -> Result<Vec<QueueMessage>, QueueError>;

    /// Acknowledge a message so it is not delivered again.
    async fn delete(&self, receipt_handle: &str) -> Result<(), QueueError>;
}
