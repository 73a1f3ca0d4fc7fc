//! Processing server HTTP client.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, warn};

use pitchside_models::UploadFile;

use crate::error::{TransportError, TransportResult};
use crate::types::{TransferProgress, UploadResponse};

/// Configuration for the upload client.
#[derive(Debug, Clone)]
pub struct UploadClientConfig {
    /// Base URL of the processing server
    pub base_url: String,
    /// Request timeout covering upload and server-side processing
    pub timeout: Duration,
    /// Read size for the upload body stream
    pub chunk_size: usize,
}

impl Default for UploadClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout: Duration::from_secs(600), // long timeout for video processing
            chunk_size: 64 * 1024,
        }
    }
}

impl UploadClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("PITCHSIDE_SERVER_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            timeout: Duration::from_secs(
                std::env::var("PITCHSIDE_UPLOAD_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(600),
            ),
            chunk_size: 64 * 1024,
        }
    }
}

/// Client for the video processing server.
pub struct UploadClient {
    http: Client,
    config: UploadClientConfig,
}

impl UploadClient {
    /// Create a new upload client.
    pub fn new(config: UploadClientConfig) -> TransportResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(TransportError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> TransportResult<Self> {
        Self::new(UploadClientConfig::from_env())
    }

    /// Upload a video for processing.
    ///
    /// The file is streamed as the `video` field of a multipart form;
    /// `on_progress` is invoked with cumulative byte counts as chunks are
    /// handed to the request body. Any non-success status is folded into a
    /// single [`TransportError::RequestFailed`] with no further distinction.
    pub async fn send<F>(&self, file: &UploadFile, on_progress: F) -> TransportResult<UploadResponse>
    where
        F: Fn(TransferProgress) + Send + Sync + 'static,
    {
        let total = file.size_bytes();
        let source = tokio::fs::File::open(file.path()).await?;

        let chunk_size = self.config.chunk_size;
        let on_progress = Arc::new(on_progress);
        let stream = futures_util::stream::unfold(
            (source, 0u64),
            move |(mut source, sent)| {
                let on_progress = on_progress.clone();
                async move {
                    let mut buf = vec![0u8; chunk_size];
                    match source.read(&mut buf).await {
                        Ok(0) => None,
                        Ok(n) => {
                            buf.truncate(n);
                            let sent = sent + n as u64;
                            on_progress(TransferProgress {
                                bytes_sent: sent,
                                bytes_total: total,
                            });
                            Some((Ok::<_, std::io::Error>(buf), (source, sent)))
                        }
                        Err(e) => Some((Err(e), (source, sent))),
                    }
                }
            },
        );

        let part = Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(file.file_name().to_string())
            .mime_str(file.mime_type())?;
        let form = Form::new().part("video", part);

        let url = format!("{}/upload", self.config.base_url);
        debug!("Uploading {} ({} bytes) to {}", file.file_name(), total, url);

        let response = self.http.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!("Upload rejected: status {}", status);
            return Err(TransportError::RequestFailed { status, body });
        }

        let payload: UploadResponse = response
            .json()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

        Ok(payload)
    }

    /// URL the processed video can be fetched from.
    pub fn download_url(&self, processed_video_url: &str) -> String {
        format!("{}/download/{}", self.config.base_url, processed_video_url)
    }

    /// Fetch the processed video to a local path. Returns bytes written.
    pub async fn download(&self, processed_video_url: &str, dest: &Path) -> TransportResult<u64> {
        let url = self.download_url(processed_video_url);
        debug!("Downloading processed video from {}", url);

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::RequestFailed { status, body });
        }

        let mut out = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(TransportError::Network)?;
            out.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        out.flush().await?;

        Ok(written)
    }
}
