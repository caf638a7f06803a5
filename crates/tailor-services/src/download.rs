//! Saving composite results to disk

use anyhow::{Context, Result};
use base64::Engine;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::session::presentation::DownloadRequest;

/// Fetches a composite image reference and writes it into a directory
#[derive(Debug, Clone)]
pub struct ResultDownloader {
    http_client: reqwest::Client,
}

impl ResultDownloader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for result downloads")?;

        Ok(Self { http_client })
    }

    /// Resolve an image reference into bytes. Supports `http(s)` URLs and `data:` URIs.
    pub async fn fetch(&self, url: &str) -> Result<Bytes> {
        if let Some(rest) = url.strip_prefix("data:") {
            return decode_data_uri(rest);
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("Unsupported image reference: {}", url);
        }

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .context("Failed to download result image")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to download result image: {}",
                response.status()
            ));
        }

        response
            .bytes()
            .await
            .context("Failed to read result image data")
    }

    /// Download `request.url` into `dir/request.filename`
    pub async fn save(&self, request: &DownloadRequest, dir: &Path) -> Result<PathBuf> {
        let data = self.fetch(&request.url).await?;

        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create download directory: {}", dir.display()))?;

        let path = dir.join(&request.filename);
        tokio::fs::write(&path, &data)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            size = data.len(),
            "Result image saved"
        );

        Ok(path)
    }
}

/// Decode the part of a `data:` URI after the scheme
fn decode_data_uri(rest: &str) -> Result<Bytes> {
    let (meta, payload) = rest
        .split_once(',')
        .context("Malformed data URI: missing ','")?;

    if meta.ends_with(";base64") {
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .context("Malformed data URI: invalid base64 payload")?;
        Ok(Bytes::from(decoded))
    } else {
        Ok(Bytes::copy_from_slice(payload.as_bytes()))
    }
}
