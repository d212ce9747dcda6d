use async_trait::async_trait;
use aws_sdk_sqs::Client;
use aws_sdk_sqs::error::DisplayErrorContext;
use tracing::{debug, error};

use super::{QueueClient, QueueError, QueueMessage};

#[derive(Clone)]
pub struct SqsQueue {
    client: Client,
    queue_url: Option<String>,
}

impl SqsQueue {
    pub fn new(sdk_config: &aws_config::SdkConfig, queue_url: Option<String>) -> Self {
        Self {
            client: Client::new(sdk_config),
            queue_url,
        }
    }

    fn queue_url(&self) -> Result<&str, QueueError> {
        self.queue_url.as_deref().ok_or(QueueError::NotConfigured)
    }
}

impl From<&aws_sdk_sqs::types::Message> for QueueMessage {
    fn from(message: &aws_sdk_sqs::types::Message) -> Self {
        Self {
            message_id: message.message_id().map(str::to_string),
            receipt_handle: message.receipt_handle().map(str::to_string),
            body: message
                .body()
                .map(|b| serde_json::Value::String(b.to_string())),
        }
    }
}

#[async_trait]
impl QueueClient for SqsQueue {
    async fn receive(&self, max_messages: i32) -> Result<Vec<QueueMessage>, QueueError> {
        let output = self
            .client
            .receive_message()
            .queue_url(self.queue_url()?)
            .max_number_of_messages(max_messages)
            .send()
            .await
            .map_err(|e| {
                error!("SQS receive failed: {}", DisplayErrorContext(&e));
                QueueError::Receive(DisplayErrorContext(&e).to_string())
            })?;

        let messages: Vec<QueueMessage> = output.messages().iter().map(QueueMessage::from).collect();
        debug!(count = messages.len(), "received messages");
        Ok(messages)
    }

    async fn delete(&self, receipt_handle: &str) -> Result<(), QueueError> {
        self.client
            .delete_message()
            .queue_url(self.queue_url()?)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| {
                error!("SQS delete failed: {}", DisplayErrorContext(&e));
                QueueError::Delete(DisplayErrorContext(&e).to_string())
            })?;

        Ok(())
    }
}
