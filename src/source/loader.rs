//! Image loader: resolves [`ImageSource`] references to decoded pixels.
//!
//! The engine treats loading as an opaque collaborator. [`DefaultLoader`]
//! covers URLs, data URIs, files and in-memory buffers; callers with other
//! storage (object stores, caches) implement [`ImageLoader`] themselves.

use async_trait::async_trait;
use futures::future::try_join_all;
use image::DynamicImage;
use std::time::Duration;

use super::{ImageSource, decode};
use crate::error::CollageError;
use crate::options::CombineItem;

/// Resolves one image reference.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, source: &ImageSource) -> Result<DynamicImage, CollageError>;
}

/// Loader backed by an HTTP client and the local filesystem.
#[derive(Debug, Clone)]
pub struct DefaultLoader {
    http_client: reqwest::Client,
    allow_files: bool,
}

impl DefaultLoader {
    pub const USER_AGENT: &'static str = concat!("collage/", env!("CARGO_PKG_VERSION"));
    pub const TIMEOUT: Duration = Duration::from_secs(30);

    /// Loader with its own HTTP client.
    pub fn new() -> Result<Self, CollageError> {
        let http_client = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(|e| CollageError::Transport(format!("HTTP client error: {}", e)))?;
        Ok(Self::with_client(http_client))
    }

    /// Loader sharing an existing HTTP client.
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            allow_files: true,
        }
    }

    /// Refuse `Path` sources (used when references come from remote callers).
    pub fn deny_files(mut self) -> Self {
        self.allow_files = false;
        self
    }

    async fn fetch(&self, url: &str, reference: &str) -> Result<Vec<u8>, CollageError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| CollageError::image_load(reference, format!("download failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(CollageError::image_load(
                reference,
                format!("HTTP {}", response.status()),
            ));
        }
        let bytes = response.bytes().await.map_err(|e| {
            CollageError::image_load(reference, format!("failed to read image data: {}", e))
        })?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ImageLoader for DefaultLoader {
    async fn load(&self, source: &ImageSource) -> Result<DynamicImage, CollageError> {
        let reference = source.describe();
        match source {
            ImageSource::Decoded(img) => Ok(img.as_ref().clone()),
            ImageSource::Bytes(bytes) => decode::decode_bytes(bytes, &reference),
            ImageSource::DataUri(uri) => {
                let bytes = decode::decode_data_uri(uri)
                    .map_err(|e| CollageError::image_load(&reference, e))?;
                decode::decode_bytes(&bytes, &reference)
            }
            ImageSource::Url(url) => {
                let bytes = self.fetch(url, &reference).await?;
                decode::decode_bytes(&bytes, &reference)
            }
            ImageSource::Path(path) => {
                if !self.allow_files {
                    return Err(CollageError::image_load(
                        &reference,
                        "file sources are disabled",
                    ));
                }
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| CollageError::image_load(&reference, e))?;
                decode::decode_bytes(&bytes, &reference)
            }
        }
    }
}

/// Load every item's image concurrently.
///
/// Resolves once all loads succeed, in item order. The first failure wins and
/// the remaining loads are abandoned.
pub async fn load_all(
    loader: &dyn ImageLoader,
    items: &[CombineItem],
) -> Result<Vec<DynamicImage>, CollageError> {
    try_join_all(items.iter().map(|item| loader.load(&item.source))).await
}
