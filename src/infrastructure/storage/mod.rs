pub mod s3;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use s3::StorageService;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to sign download url: {0}")]
    Presign(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignedUrlProvider: Send + Sync {
    /// Time-limited GET url for `bucket/key`.
    async fn signed_download_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError>;
}
