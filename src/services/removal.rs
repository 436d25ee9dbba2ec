//! Background-removal collaborator.
//!
//! DESIGN
//! ======
//! Raw image bytes are POSTed to an external segmentation service, which
//! answers with a PNG cutout. The service is optional for the user: when it
//! is down or returns garbage, `remove_or_fallback` hands back the original
//! upload so the wardrobe flow is never blocked.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::AppConfig;

/// Content type of a successful cutout.
pub const PROCESSED_CONTENT_TYPE: &str = "image/png";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RemovalError {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("removal request failed: {0}")]
    Request(String),
    /// The service answered with a non-success status.
    #[error("removal service error: status {status}")]
    Upstream { status: u16, body: String },
    /// The service answered 2xx with no image.
    #[error("removal service returned an empty body")]
    EmptyResponse,
    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl RemovalError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_REMOVAL_REQUEST",
            Self::Upstream { .. } => "E_REMOVAL_UPSTREAM",
            Self::EmptyResponse => "E_REMOVAL_EMPTY",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }
}

/// An image ready to be stored in the wardrobe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
    /// `false` when the original upload was returned unchanged.
    pub background_removed: bool,
}

/// Anything that can cut the background out of an image.
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    async fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>, RemovalError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpBackgroundRemover {
    http: reqwest::Client,
    url: String,
}

impl HttpBackgroundRemover {
    /// # Errors
    ///
    /// Returns `HttpClientBuild` if the reqwest client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, RemovalError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.removal_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| RemovalError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, url: config.removal_api_url.clone() })
    }
}

#[async_trait]
impl BackgroundRemover for HttpBackgroundRemover {
    async fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>, RemovalError> {
        let response = self
            .http
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| RemovalError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemovalError::Upstream { status: status.as_u16(), body });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemovalError::Request(e.to_string()))?;
        if bytes.is_empty() {
            return Err(RemovalError::EmptyResponse);
        }
        Ok(bytes.to_vec())
    }
}

// =============================================================================
// FALLBACK
// =============================================================================

/// Remove the background, or return the original image if that fails.
pub async fn remove_or_fallback(remover: &dyn BackgroundRemover, image: Vec<u8>, content_type: &str) -> ProcessedImage {
    match remover.remove_background(&image).await {
        Ok(bytes) => {
            info!(input = image.len(), output = bytes.len(), "background removed");
            ProcessedImage { bytes, content_type: PROCESSED_CONTENT_TYPE.to_string(), background_removed: true }
        }
        Err(e) => {
            warn!(error = %e, code = e.error_code(), "background removal failed; using original image");
            ProcessedImage { bytes: image, content_type: content_type.to_string(), background_removed: false }
        }
    }
}

#[cfg(test)]
#[path = "removal_test.rs"]
mod tests;
