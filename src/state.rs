use std::sync::Arc;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::info;

use crate::config::settings::{ConsumerConfig, WorkerConfig};
use crate::infrastructure::invoker::LambdaInvoker;
use crate::infrastructure::media::{MediaError, WixMediaClient};
use crate::infrastructure::queue::SqsQueue;
use crate::infrastructure::storage::StorageService;
use crate::modules::dispatch::Dispatcher;
use crate::modules::ingest::{AckPolicy, JobSubmitter};

pub async fn load_aws_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

pub struct ConsumerState {
    pub config: ConsumerConfig,
    pub dispatcher: Dispatcher,
}

impl ConsumerState {
    pub async fn new(config: ConsumerConfig) -> Self {
        let sdk_config = load_aws_config(&config.region).await;
        let dispatcher = Dispatcher::new(
            Arc::new(SqsQueue::new(&sdk_config, Some(config.queue_url.clone()))),
            Arc::new(LambdaInvoker::new(&sdk_config)),
            config.worker_function.clone(),
        );

        info!("✅ Dispatcher ready for {}", config.worker_function);
        Self { config, dispatcher }
    }
}

pub struct WorkerState {
    pub config: WorkerConfig,
    pub submitter: JobSubmitter,
}

impl WorkerState {
    pub async fn new(config: WorkerConfig) -> Result<Self, MediaError> {
        let sdk_config = load_aws_config(&config.region).await;
        let submitter = JobSubmitter::new(
            Arc::new(StorageService::new(&sdk_config)),
            Arc::new(WixMediaClient::new(config.media.clone())?),
            Arc::new(SqsQueue::new(&sdk_config, config.queue_url.clone())),
            config.paths.clone(),
            config.template.clone(),
            AckPolicy {
                local_mode: config.local_mode,
                ack_skipped: config.ack_skipped,
            },
        );

        info!(
            override_existing = config.paths.override_existing,
            use_timestamp = config.paths.use_timestamp,
            local_mode = config.local_mode,
            "✅ Job submitter ready"
        );
        Ok(Self { config, submitter })
    }
}
