pub mod client;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::YandexDiskClient;

#[derive(Debug, Error)]
pub enum DiskError {
    #[error("Invalid public link: {0}")]
    InvalidLink(String),
    #[error("Disk API unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("Disk API rejected the request ({status}): {message}")]
    UpstreamRejected { status: u16, message: String },
    #[error("No download link for {0}")]
    DownloadUnavailable(String),
    #[error("Archive error: {0}")]
    Archive(String),
}

impl From<reqwest::Error> for DiskError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => DiskError::UpstreamRejected {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => DiskError::UpstreamUnavailable(err.to_string()),
        }
    }
}

pub type DiskResult<T> = Result<T, DiskError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    File,
    Dir,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::File => "file",
            ResourceType::Dir => "dir",
        }
    }
}

/// One item behind a public link, converted from the provider's resource
/// JSON at the client boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub md5: Option<String>,
}

impl FileEntry {
    pub fn is_file(&self) -> bool {
        self.resource_type == ResourceType::File
    }
}

/// Response body of a direct download URL.
pub struct FetchedBody {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub stream: BoxStream<'static, DiskResult<Bytes>>,
}

/// Largest buffer [`FetchedBody::collect`] reserves before any bytes arrive.
pub const MAX_PREALLOCATION: usize = 8 * 1024 * 1024;

impl FetchedBody {
    pub fn from_bytes(content_type: Option<String>, bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self {
            content_type,
            content_length: Some(bytes.len() as u64),
            stream: futures::stream::once(async move { Ok(bytes) }).boxed(),
        }
    }

    /// Buffers the whole body in memory. The upfront reservation trusts
    /// `Content-Length` only up to [`MAX_PREALLOCATION`].
    pub async fn collect(self) -> DiskResult<Vec<u8>> {
        let capacity = self
            .content_length
            .unwrap_or(0)
            .min(MAX_PREALLOCATION as u64) as usize;
        self.stream
            .try_fold(Vec::with_capacity(capacity), |mut buf, chunk| async move {
                buf.extend_from_slice(&chunk);
                Ok(buf)
            })
            .await
    }
}

/// Calls against the public resources API. `token` is the session's OAuth
/// access token, if any.
#[async_trait]
pub trait DiskApi: Send + Sync {
    async fn list_resources(
        &self,
        public_key: &str,
        token: Option<&str>,
    ) -> DiskResult<Vec<FileEntry>>;

    async fn resolve_download_url(
        &self,
        public_key: &str,
        path: &str,
        token: Option<&str>,
    ) -> DiskResult<String>;

    async fn fetch(&self, href: &str) -> DiskResult<FetchedBody>;
}
