//! This module provides a retryable HTTP client for outbound requests.

mod client;

pub use client::create_retryable_http_client;
