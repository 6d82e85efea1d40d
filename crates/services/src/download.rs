use std::sync::Arc;

use bytes::Bytes;
use futures::stream::BoxStream;
use tracing::{debug, info, warn};

use crate::archive::{ArchiveBuilder, base_name};
use crate::disk::{DiskApi, DiskResult};
use crate::listing::validate_public_key;

const FALLBACK_FILE_NAME: &str = "download";

/// A single file streamed through from its direct download URL.
pub struct DownloadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub stream: BoxStream<'static, DiskResult<Bytes>>,
}

pub struct DownloadService {
    api: Arc<dyn DiskApi>,
}

impl DownloadService {
    pub fn new(api: Arc<dyn DiskApi>) -> Self {
        Self { api }
    }

    pub async fn download_one(
        &self,
        public_key: &str,
        path: &str,
        token: Option<&str>,
    ) -> DiskResult<DownloadedFile> {
        let public_key = validate_public_key(public_key)?;
        let href = self
            .api
            .resolve_download_url(&public_key, path, token)
            .await?;
        debug!(%path, "Resolved download link");

        let body = self.api.fetch(&href).await?;
        let file_name = match base_name(path) {
            "" => FALLBACK_FILE_NAME.to_string(),
            name => name.to_string(),
        };

        Ok(DownloadedFile {
            file_name,
            content_type: body.content_type,
            content_length: body.content_length,
            stream: body.stream,
        })
    }

    /// Zips every path that can be fetched, in request order. A path that
    /// fails to resolve or download is logged and left out; the archive is
    /// produced even when it ends up empty.
    pub async fn download_many(
        &self,
        public_key: &str,
        paths: &[String],
        token: Option<&str>,
    ) -> DiskResult<Vec<u8>> {
        let public_key = validate_public_key(public_key)?;
        let mut archive = ArchiveBuilder::new();

        for path in paths {
            let data = match self.fetch_bytes(&public_key, path, token).await {
                Ok(data) => data,
                Err(e) => {
                    warn!(%path, error = %e, "Skipping file in archive");
                    continue;
                }
            };

            if let Err(e) = archive.add(base_name(path), &data) {
                warn!(%path, error = %e, "Skipping file in archive");
            }
        }

        info!(
            requested = paths.len(),
            archived = archive.len(),
            "Built download archive"
        );
        archive.finish()
    }

    async fn fetch_bytes(
        &self,
        public_key: &str,
        path: &str,
        token: Option<&str>,
    ) -> DiskResult<Vec<u8>> {
        let href = self
            .api
            .resolve_download_url(public_key, path, token)
            .await?;
        self.api.fetch(&href).await?.collect().await
    }
}
