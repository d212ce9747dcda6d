use async_trait::async_trait;
use aws_sdk_lambda::Client;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use tracing::{debug, error};

use super::{InvokeError, Invoker};

#[derive(Clone)]
pub struct LambdaInvoker {
    client: Client,
}

impl LambdaInvoker {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl Invoker for LambdaInvoker {
    async fn invoke_async(&self, target: &str, payload: Vec<u8>) -> Result<(), InvokeError> {
        let output = self
            .client
            .invoke()
            .function_name(target)
            .invocation_type(InvocationType::Event)
            .payload(Blob::new(payload))
            .send()
            .await
            .map_err(|e| {
                error!("Lambda invoke of {} failed: {}", target, DisplayErrorContext(&e));
                InvokeError {
                    target: target.to_string(),
                    reason: DisplayErrorContext(&e).to_string(),
                }
            })?;

        debug!(function = %target, status = output.status_code(), "invocation accepted");
        Ok(())
    }
}
