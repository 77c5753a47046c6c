//! This module defines the interface for fetching alert batches from the
//! detection endpoint.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::StatusCode;
use thiserror::Error;

use crate::models::Alert;

/// Custom error type for detection fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure: DNS, connect, or the request timeout
    /// elapsing.
    #[error("network error: {0}")]
    Network(#[from] reqwest_middleware::Error),

    /// The endpoint answered with a non-2xx HTTP status.
    #[error("detection endpoint returned HTTP {0}")]
    Http(StatusCode),

    /// The response was not the expected JSON shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The endpoint answered with a decodable body whose status was not
    /// `"success"`.
    #[error("detection endpoint rejected the request: {0}")]
    ServerRejected(String),
}

/// A trait for a source that can fetch detection alert batches.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DetectionSource: Send + Sync {
    /// Fetches one batch of alerts from the detection endpoint.
    ///
    /// Individual records that cannot be parsed are dropped with a warning;
    /// they never fail the whole batch.
    async fn fetch_batch(&self) -> Result<Vec<Alert>, FetchError>;
}
