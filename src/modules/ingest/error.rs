use thiserror::Error;

use crate::infrastructure::media::{FlowHandle, MediaError};
use crate::infrastructure::queue::QueueError;
use crate::infrastructure::storage::StorageError;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{0}")]
    MalformedInput(String),

    #[error(transparent)]
    Signing(#[from] StorageError),

    #[error("error checking if file exists at {path}: {source}")]
    Lookup { path: String, source: MediaError },

    #[error("error deleting existing file at {path}: {source}")]
    DeleteExisting { path: String, source: MediaError },

    #[error("error in flow request: {0}")]
    CreateFlow(#[source] MediaError),

    #[error("flow {flow} was created but the message could not be acknowledged: {source}")]
    AcknowledgeFailed { flow: FlowHandle, source: QueueError },

    #[error("failed to acknowledge skipped message: {0}")]
    Queue(#[from] QueueError),
}
