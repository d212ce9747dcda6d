use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::presigning::PresigningConfig;
use tracing::{debug, error};

use super::{SignedUrlProvider, StorageError};

#[derive(Clone)]
pub struct StorageService {
    client: Client,
}

impl StorageService {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl SignedUrlProvider for StorageService {
    async fn signed_download_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let presign_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(|e| {
                error!("Failed to presign s3://{}/{}: {}", bucket, key, e);
                StorageError::Presign(e.to_string())
            })?;

        debug!(bucket, key, "presigned download url");
        Ok(presigned.uri().to_string())
    }
}
