use crate::constants::{
    COMPRESSION_COUNT_HEADER, DEFAULT_TINIFY_ENDPOINT, TINIFY_API_KEY_ENV, TINIFY_API_USER,
    TINIFY_SHRINK_PATH,
};
use crate::error::{Result, ShrinkError};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{header, redirect, Client, Url};
use std::time::Duration;
use tracing::debug;

/// Shrinks an encoded image buffer.
///
/// `TinifyClient` is the production implementation; the batch runner only
/// depends on this trait so it can be driven with fakes.
#[async_trait]
pub trait Compressor: Send + Sync {
    async fn compress(&self, buffer: Vec<u8>) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct CompressorConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_TINIFY_ENDPOINT.to_string(),
            timeout: None,
        }
    }
}

impl CompressorConfig {
    pub fn new(api_key: Option<String>, endpoint: Option<String>) -> Self {
        Self {
            api_key,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_TINIFY_ENDPOINT.to_string()),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the Tinify shrink protocol: upload to `/shrink`, then fetch
/// the compressed artifact from the returned `Location`.
pub struct TinifyClient {
    client: Client,
    config: CompressorConfig,
}

impl TinifyClient {
    pub fn new(config: CompressorConfig) -> Result<Self> {
        // A redirected upload is reported, not followed: one POST and one GET per call.
        let mut builder = Client::builder().redirect(redirect::Policy::none());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ShrinkError::Configuration(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// `Basic base64("api:" + key)`. A missing or empty key is reported here,
    /// on first use, rather than at construction.
    fn authorization(&self) -> Result<String> {
        let key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ShrinkError::Configuration(format!(
                    "no API key configured, set {}",
                    TINIFY_API_KEY_ENV
                ))
            })?;

        let credentials = STANDARD.encode(format!("{}:{}", TINIFY_API_USER, key));
        Ok(format!("Basic {}", credentials))
    }

    fn shrink_url(&self) -> Result<Url> {
        let raw = format!(
            "{}{}",
            self.config.endpoint.trim_end_matches('/'),
            TINIFY_SHRINK_PATH
        );
        Url::parse(&raw)
            .map_err(|e| ShrinkError::Configuration(format!("invalid endpoint {}: {}", raw, e)))
    }

    async fn upload(&self, authorization: &str, buffer: Vec<u8>) -> Result<Url> {
        let url = self.shrink_url()?;
        debug!("Uploading {} bytes to {}", buffer.len(), url);

        let response = self
            .client
            .post(url.clone())
            .header(header::AUTHORIZATION, authorization)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(buffer)
            .send()
            .await
            .map_err(|e| ShrinkError::Upload(format!("request to {} failed: {}", url, e)))?;

        if let Some(count) = response
            .headers()
            .get(COMPRESSION_COUNT_HEADER)
            .and_then(|value| value.to_str().ok())
        {
            debug!("Compressions used this month: {}", count);
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ShrinkError::Upload(format!(
                "upload rejected with status {}: {}",
                status,
                body.trim()
            )));
        }

        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ShrinkError::Upload(format!(
                    "upload succeeded with status {} but returned no Location header",
                    status
                ))
            })?;

        response.url().join(location).map_err(|e| {
            ShrinkError::Upload(format!("invalid Location header {:?}: {}", location, e))
        })
    }

    async fn download(&self, authorization: &str, location: Url) -> Result<Vec<u8>> {
        debug!("Fetching compressed result from {}", location);

        let response = self
            .client
            .get(location.clone())
            .header(header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| ShrinkError::Download(format!("request to {} failed: {}", location, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShrinkError::Download(format!(
                "download from {} failed with status {}",
                location, status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ShrinkError::Download(format!("reading body from {}: {}", location, e)))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Compressor for TinifyClient {
    async fn compress(&self, buffer: Vec<u8>) -> Result<Vec<u8>> {
        let authorization = self.authorization()?;
        let location = self.upload(&authorization, buffer).await?;
        self.download(&authorization, location).await
    }
}
