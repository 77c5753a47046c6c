//! This module builds the shared outbound HTTP client: a bounded
//! per-request timeout plus retry middleware for transient errors such as
//! network blips or rate limiting.

use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{Jitter, RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::config::{HttpRetryConfig, JitterSetting};

/// Creates the outbound HTTP client used for both the detection endpoint
/// and the push relay.
///
/// The timeout is applied to every request made through the returned
/// client; a hung connection must fail within that bound or the poll loop
/// would stall on it.
///
/// # Parameters:
/// - `retry`: Configuration for the transient-error retry policy
/// - `request_timeout`: Bound applied to each outbound request
///
/// # Returns
/// A `ClientWithMiddleware` with the timeout and retry policy applied, or
/// the underlying builder error.
pub fn create_retryable_http_client(
    retry: &HttpRetryConfig,
    request_timeout: Duration,
) -> reqwest::Result<ClientWithMiddleware> {
    let base_client = reqwest::Client::builder().timeout(request_timeout).build()?;

    let policy_builder = match retry.jitter {
        JitterSetting::None => ExponentialBackoff::builder().jitter(Jitter::None),
        JitterSetting::Full => ExponentialBackoff::builder().jitter(Jitter::Full),
    };

    let retry_policy = policy_builder
        .base(retry.base_for_backoff)
        .retry_bounds(retry.initial_backoff_ms, retry.max_backoff_secs)
        .build_with_max_retries(retry.max_retries);

    Ok(ClientBuilder::new(base_client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}
