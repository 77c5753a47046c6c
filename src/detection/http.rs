//! HTTP implementation of the [`DetectionSource`] trait.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::ClientWithMiddleware;
use url::Url;

use super::traits::{DetectionSource, FetchError};
use crate::models::{Alert, DetectionResponse};

/// Fetches alert batches from the detection endpoint over HTTP.
///
/// The client must be constructed with a bounded request timeout; the poll
/// loop relies on every fetch completing or failing within that bound.
pub struct HttpDetectionSource {
    /// Base URL of the detection endpoint, also the origin that relative
    /// media references resolve against.
    base_url: Url,
    /// Fully resolved `{base}/detect` URL.
    detect_url: Url,
    /// Configured HTTP client with retry middleware.
    client: Arc<ClientWithMiddleware>,
}

impl HttpDetectionSource {
    /// Creates a new `HttpDetectionSource` for the given endpoint.
    pub fn new(base_url: Url, client: Arc<ClientWithMiddleware>) -> Result<Self, FetchError> {
        let detect_url = base_url
            .join("detect")
            .map_err(|e| FetchError::Malformed(format!("invalid detection base URL: {e}")))?;
        Ok(Self { base_url, detect_url, client })
    }
}

#[async_trait]
impl DetectionSource for HttpDetectionSource {
    async fn fetch_batch(&self) -> Result<Vec<Alert>, FetchError> {
        let response = self.client.get(self.detect_url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("application/json") {
            return Err(FetchError::Malformed(format!(
                "unexpected content type: {content_type:?}"
            )));
        }

        let body = response.text().await.map_err(reqwest_middleware::Error::from)?;
        let parsed: DetectionResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::Malformed(format!("undecodable JSON: {e}")))?;

        if parsed.status != "success" {
            return Err(FetchError::ServerRejected(
                parsed.message.unwrap_or(parsed.status),
            ));
        }

        let mut alerts = Vec::with_capacity(parsed.detected_faces.len());
        for record in parsed.detected_faces {
            match record.into_alert(&self.base_url) {
                Ok(alert) => alerts.push(alert),
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping malformed detection record.");
                }
            }
        }
        Ok(alerts)
    }
}
