//! Client for the remote media platform: file lookup/deletion and flow
//! creation.

pub mod auth;
pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::WixMediaClient;

#[derive(Clone, Debug)]
pub struct MediaConfig {
    /// Bare domain (`https` is assumed) or a full base url, path prefix included.
    pub domain: String,
    pub app_id: String,
    pub shared_secret: String,
}

/// Metadata of a file stored on the platform.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileDescriptor {
    pub id: Option<String>,
    pub path: Option<String>,
    pub mime_type: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub size: Option<i64>,
    pub acl: Option<String>,
}

/// Body of a flow creation call, already rendered from a template.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CreateFlowRequest(pub serde_json::Value);

/// Id of a created flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlowHandle(pub String);

impl std::fmt::Display for FlowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("media platform returned {status} (code {code}): {message}")]
    Api {
        status: u16,
        code: i64,
        message: String,
    },

    #[error("flow response carried no id")]
    MissingFlowId,

    #[error("invalid media platform url: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to sign request token: {0}")]
    Auth(#[from] jsonwebtoken::errors::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaPlatform: Send + Sync {
    /// `Ok(None)` when nothing exists at `path`.
    async fn lookup(&self, path: &str) -> Result<Option<FileDescriptor>, MediaError>;

    async fn delete(&self, path: &str) -> Result<(), MediaError>;

    async fn create_flow(&self, request: &CreateFlowRequest) -> Result<FlowHandle, MediaError>;
}
