use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};

use super::error::SubmitError;
use super::events::{StorageObject, parse_notification};
use super::flow::FlowTemplate;
use super::model::{JobRequest, Submission};
use super::paths::PathPolicy;
use crate::infrastructure::media::{FlowHandle, MediaPlatform};
use crate::infrastructure::queue::{QueueClient, QueueError, QueueMessage};
use crate::infrastructure::storage::SignedUrlProvider;

pub const SIGNED_URL_TTL: Duration = Duration::from_secs(30 * 60);

/// When a handled message gets deleted from the queue.
#[derive(Clone, Copy, Debug, Default)]
pub struct AckPolicy {
    /// Local runs never touch the queue.
    pub local_mode: bool,
    /// Delete non-video notifications instead of leaving them for redelivery.
    pub ack_skipped: bool,
}

/// Turns one queue message into one import+transcode flow.
///
/// Flow:
/// 1. Parse the S3 notification from the message body
/// 2. Skip objects that are not videos
/// 3. Sign a download url for the object
/// 4. Compute import and transcode destinations
/// 5. If overriding, remove an existing import at the same path
/// 6. Create the flow
/// 7. Delete the message from the queue
pub struct JobSubmitter {
    storage: Arc<dyn SignedUrlProvider>,
    media: Arc<dyn MediaPlatform>,
    queue: Arc<dyn QueueClient>,
    paths: PathPolicy,
    template: FlowTemplate,
    ack: AckPolicy,
    clock: fn() -> i64,
}

impl JobSubmitter {
    pub fn new(
        storage: Arc<dyn SignedUrlProvider>,
        media: Arc<dyn MediaPlatform>,
        queue: Arc<dyn QueueClient>,
        paths: PathPolicy,
        template: FlowTemplate,
        ack: AckPolicy,
    ) -> Self {
        Self {
            storage,
            media,
            queue,
            paths,
            template,
            ack,
            clock: unix_millis,
        }
    }

    /// Replace the source of path timestamps.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    #[instrument(skip_all, fields(message_id = message.message_id.as_deref().unwrap_or("-")))]
    pub async fn handle(&self, message: &QueueMessage) -> Result<Submission, SubmitError> {
        let timestamp = (self.clock)();
        let object = parse_notification(message.body.as_ref())?;

        let content_type = mime_guess::from_path(&object.key).first();
        if !content_type.as_ref().is_some_and(|m| m.type_() == mime::VIDEO) {
            warn!(key = %object.key, ?content_type, "File is not a video, skipping");
            if self.ack.ack_skipped {
                self.require_receipt(message)?;
                self.acknowledge(message).await?;
            }
            return Ok(Submission::Skipped {
                key: object.key,
                content_type: content_type.map(|m| m.to_string()),
            });
        }

        // Checked before any remote work so a flow is never created that
        // cannot be acknowledged.
        self.require_receipt(message)?;
        let flow = self.submit(&object, timestamp).await?;

        if let Err(source) = self.acknowledge(message).await {
            error!(%flow, "flow created but message was not acknowledged: {}", source);
            return Err(SubmitError::AcknowledgeFailed { flow, source });
        }

        info!(%flow, key = %object.key, "✅ flow created");
        Ok(Submission::Created(flow))
    }

    async fn submit(&self, object: &StorageObject, timestamp: i64) -> Result<FlowHandle, SubmitError> {
        let signed_source_url = self
            .storage
            .signed_download_url(&object.bucket, &object.key, SIGNED_URL_TTL)
            .await?;

        let destinations = self.paths.destinations(&object.key, timestamp);
        info!(
            import_path = %destinations.import_path,
            transcode_directory = %destinations.transcode_directory,
            "computed destinations"
        );

        if self.paths.override_existing {
            self.clear_import_path(&destinations.import_path).await?;
        }

        let job = JobRequest {
            signed_source_url,
            import_path: destinations.import_path,
            transcode_directory: destinations.transcode_directory,
        };

        self.media
            .create_flow(&self.template.render(&job))
            .await
            .map_err(|e| {
                error!("error in flow request: {}", e);
                SubmitError::CreateFlow(e)
            })
    }

    async fn clear_import_path(&self, path: &str) -> Result<(), SubmitError> {
        let existing = self.media.lookup(path).await.map_err(|source| {
            error!(path, "Error checking if file exists: {}", source);
            SubmitError::Lookup {
                path: path.to_string(),
                source,
            }
        })?;

        if existing.is_none() {
            debug!(path, "nothing to replace");
            return Ok(());
        }

        info!(path, "replacing existing import");
        self.media.delete(path).await.map_err(|source| {
            error!(path, "Error deleting existing file: {}", source);
            SubmitError::DeleteExisting {
                path: path.to_string(),
                source,
            }
        })
    }

    fn require_receipt(&self, message: &QueueMessage) -> Result<(), SubmitError> {
        if self.ack.local_mode || message.receipt_handle.is_some() {
            return Ok(());
        }
        Err(SubmitError::MalformedInput(
            "message carries no receipt handle".to_string(),
        ))
    }

    async fn acknowledge(&self, message: &QueueMessage) -> Result<(), QueueError> {
        if self.ack.local_mode {
            debug!("local mode, message not acknowledged");
            return Ok(());
        }
        match message.receipt_handle.as_deref() {
            Some(receipt) => self.queue.delete(receipt).await,
            None => Ok(()),
        }
    }
}

fn unix_millis() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
