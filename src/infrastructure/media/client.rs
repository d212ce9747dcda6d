use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use super::auth::sign_app_token;
use super::{CreateFlowRequest, FileDescriptor, FlowHandle, MediaConfig, MediaError, MediaPlatform};

// Relative, so they resolve under any path prefix of the base url.
const FILES_ENDPOINT: &str = "_api/files";
const FLOW_ENDPOINT: &str = "_api/flow_control/flow";
const NOT_FOUND_CODE: i64 = 404;

/// Response envelope shared by every platform endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    message: String,
    payload: Option<T>,
}

#[derive(Debug, Deserialize)]
struct FlowPayload {
    id: Option<String>,
}

#[derive(Clone)]
pub struct WixMediaClient {
    http: reqwest::Client,
    base_url: Url,
    config: MediaConfig,
}

impl WixMediaClient {
    pub fn new(config: MediaConfig) -> Result<Self, MediaError> {
        let mut base_url = if config.domain.contains("://") {
            Url::parse(&config.domain)?
        } else {
            Url::parse(&format!("https://{}", config.domain))?
        };
        if !base_url.path().ends_with('/') {
            let prefix = format!("{}/", base_url.path());
            base_url.set_path(&prefix);
        }

        info!("✅ Media platform client ready for {}", base_url);
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            config,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, MediaError> {
        Ok(self.base_url.join(path)?)
    }

    fn token(&self) -> Result<String, MediaError> {
        sign_app_token(&self.config, time::OffsetDateTime::now_utc().unix_timestamp())
    }

    async fn read_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
        subject: &str,
    ) -> Result<Option<T>, MediaError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(MediaError::NotFound(subject.to_string()));
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(MediaError::Api {
                status: status.as_u16(),
                code: status.as_u16() as i64,
                message: body,
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        match envelope.code {
            0 => Ok(envelope.payload),
            NOT_FOUND_CODE => Err(MediaError::NotFound(subject.to_string())),
            code => Err(MediaError::Api {
                status: status.as_u16(),
                code,
                message: envelope.message,
            }),
        }
    }
}

#[async_trait]
impl MediaPlatform for WixMediaClient {
    async fn lookup(&self, path: &str) -> Result<Option<FileDescriptor>, MediaError> {
        let response = self
            .http
            .get(self.endpoint(FILES_ENDPOINT)?)
            .query(&[("path", path)])
            .header(AUTHORIZATION, self.token()?)
            .send()
            .await?;

        match Self::read_envelope::<FileDescriptor>(response, path).await {
            Ok(Some(file)) => Ok(Some(file)),
            // An empty payload on success still means the path is taken.
            Ok(None) => Ok(Some(FileDescriptor::default())),
            Err(MediaError::NotFound(_)) => {
                debug!(path, "no file at path");
                Ok(None)
            }
            Err(e) => {
                warn!(path, "file lookup failed: {}", e);
                Err(e)
            }
        }
    }

    async fn delete(&self, path: &str) -> Result<(), MediaError> {
        let response = self
            .http
            .delete(self.endpoint(FILES_ENDPOINT)?)
            .query(&[("path", path)])
            .header(AUTHORIZATION, self.token()?)
            .send()
            .await?;

        Self::read_envelope::<serde_json::Value>(response, path).await?;
        debug!(path, "deleted file");
        Ok(())
    }

    async fn create_flow(&self, request: &CreateFlowRequest) -> Result<FlowHandle, MediaError> {
        let response = self
            .http
            .post(self.endpoint(FLOW_ENDPOINT)?)
            .header(AUTHORIZATION, self.token()?)
            .json(request)
            .send()
            .await?;

        let payload = Self::read_envelope::<FlowPayload>(response, "flow").await?;
        payload
            .and_then(|p| p.id)
            .map(FlowHandle)
            .ok_or(MediaError::MissingFlowId)
    }
}
