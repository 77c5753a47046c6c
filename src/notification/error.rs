//! Error types for the notification service.

use reqwest::StatusCode;
use thiserror::Error;

/// Defines the possible errors that can occur while dispatching a push
/// notification.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Transport-level failure talking to the push relay, including the
    /// request timeout elapsing.
    #[error("request error: {0}")]
    Request(#[from] reqwest_middleware::Error),

    /// The push relay answered with a non-2xx HTTP status.
    #[error("push relay returned HTTP {0}")]
    Http(StatusCode),
}
