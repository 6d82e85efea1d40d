use std::time::Duration;

use async_trait::async_trait;
use diskview_config::DiskSettings;
use futures::{StreamExt, TryStreamExt};
use reqwest::{Client, RequestBuilder, Response, header};
use serde::Deserialize;
use tracing::debug;

use super::{DiskApi, DiskError, DiskResult, FetchedBody, FileEntry};

#[derive(Debug, Deserialize)]
struct PublicResource {
    #[serde(rename = "_embedded")]
    embedded: Option<ResourceList>,
}

#[derive(Debug, Deserialize)]
struct ResourceList {
    #[serde(default)]
    items: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    description: Option<String>,
}

/// Talks to `cloud-api.yandex.net/v1/disk/public/resources`.
pub struct YandexDiskClient {
    client: Client,
    api_base_url: String,
    list_limit: u32,
}

impl YandexDiskClient {
    pub fn new(settings: &DiskSettings) -> DiskResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| DiskError::UpstreamUnavailable(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            list_limit: settings.list_limit,
        })
    }

    fn authorized(&self, req: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => req.header(header::AUTHORIZATION, format!("OAuth {}", token)),
            None => req,
        }
    }
}

/// Turns a non-2xx response into `UpstreamRejected`, keeping the
/// provider's own description when the body carries one.
async fn ensure_success(resp: Response) -> DiskResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.json::<ErrorBody>().await.unwrap_or_default();
    let message = body
        .description
        .or(body.message)
        .or(body.error)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

    Err(DiskError::UpstreamRejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl DiskApi for YandexDiskClient {
    async fn list_resources(
        &self,
        public_key: &str,
        token: Option<&str>,
    ) -> DiskResult<Vec<FileEntry>> {
        let req = self
            .client
            .get(&self.api_base_url)
            .query(&[("public_key", public_key)])
            .query(&[("limit", self.list_limit)]);

        let resp = self.authorized(req, token).send().await?;
        let resource: PublicResource = ensure_success(resp).await?.json().await?;

        let items = resource.embedded.map(|e| e.items).unwrap_or_default();
        debug!(count = items.len(), "Listed public resource");
        Ok(items)
    }

    async fn resolve_download_url(
        &self,
        public_key: &str,
        path: &str,
        token: Option<&str>,
    ) -> DiskResult<String> {
        let req = self
            .client
            .get(format!("{}/download", self.api_base_url))
            .query(&[("public_key", public_key), ("path", path)]);

        let resp = self.authorized(req, token).send().await?;
        let link: Link = ensure_success(resp).await?.json().await?;

        link.href
            .filter(|href| !href.is_empty())
            .ok_or_else(|| DiskError::DownloadUnavailable(path.to_string()))
    }

    async fn fetch(&self, href: &str) -> DiskResult<FetchedBody> {
        let resp = ensure_success(self.client.get(href).send().await?).await?;

        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let content_length = resp.content_length();

        Ok(FetchedBody {
            content_type,
            content_length,
            stream: resp.bytes_stream().map_err(DiskError::from).boxed(),
        })
    }
}
