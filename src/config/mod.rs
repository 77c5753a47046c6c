//! Configuration module for Doorwatch.

mod app_config;
mod helpers;
mod http_retry;

pub use app_config::{AppConfig, NotifyPolicy};
pub use helpers::{deserialize_duration_from_ms, deserialize_duration_from_seconds};
pub use http_retry::{HttpRetryConfig, JitterSetting};
