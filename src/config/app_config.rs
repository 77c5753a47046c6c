//! Application configuration, loaded from a YAML file with environment
//! variable overrides.

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use url::Url;

use super::{
    HttpRetryConfig,
    helpers::{deserialize_duration_from_ms, deserialize_duration_from_seconds},
};

/// Provides the default value for poll_interval_ms.
fn default_poll_interval() -> Duration {
    Duration::from_secs(10)
}

/// Provides the default value for request_timeout_secs.
fn default_request_timeout() -> Duration {
    Duration::from_secs(8)
}

/// Provides the default value for buffer_capacity.
fn default_buffer_capacity() -> usize {
    50
}

/// Provides the default value for push_endpoint.
fn default_push_endpoint() -> Url {
    // Expo's public push relay; overridable for self-hosted relays and tests.
    Url::parse("https://exp.host/--/api/v2/push/send").expect("static URL is valid")
}

/// Policy governing how many of a cycle's new alerts produce a push
/// notification.
///
/// The observed upstream behavior notifies only the newest new alert per
/// polling cycle even when several arrive together, so that is the default.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotifyPolicy {
    /// Dispatch a single notification for the newest new alert of the cycle.
    #[default]
    NewestOnly,
    /// Dispatch one notification per new alert admitted in the cycle.
    EveryAlert,
}

/// Application configuration for Doorwatch.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Base URL of the detection endpoint. Relative media paths in alert
    /// records are resolved against this origin.
    pub detection_base_url: Url,

    /// URL of the push-relay service notifications are POSTed to.
    #[serde(default = "default_push_endpoint")]
    pub push_endpoint: Url,

    /// Device push token, if known at startup. When absent, alerts are
    /// still ingested but no notifications are dispatched.
    #[serde(default)]
    pub device_token: Option<String>,

    /// The interval in milliseconds between polling cycles.
    #[serde(
        deserialize_with = "deserialize_duration_from_ms",
        default = "default_poll_interval"
    )]
    pub poll_interval_ms: Duration,

    /// Per-request timeout in seconds for the detection and push-relay
    /// clients. Always bounded; an unbounded request would wedge the poll
    /// loop.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_request_timeout"
    )]
    pub request_timeout_secs: Duration,

    /// Maximum number of alerts retained in the buffer.
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    /// How many of a cycle's new alerts are dispatched as notifications.
    #[serde(default)]
    pub notify_policy: NotifyPolicy,

    /// Configuration for HTTP client retry policies.
    #[serde(default)]
    pub http_retry_config: HttpRetryConfig,
}

impl AppConfig {
    /// Creates a new `AppConfig` by reading from the configuration directory.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir_str = config_dir.unwrap_or("configs");
        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/app.yaml", config_dir_str)))
            .add_source(Environment::with_prefix("DOORWATCH").separator("__"))
            .build()?;
        s.try_deserialize()
    }

    /// Creates a new `AppConfigBuilder` for testing purposes.
    #[cfg(test)]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            detection_base_url: Url::parse("http://localhost:5000")
                .expect("static URL is valid"),
            push_endpoint: default_push_endpoint(),
            device_token: None,
            poll_interval_ms: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
            buffer_capacity: default_buffer_capacity(),
            notify_policy: NotifyPolicy::default(),
            http_retry_config: HttpRetryConfig::default(),
        }
    }
}

/// A builder for creating `AppConfig` instances for testing.
#[cfg(test)]
#[derive(Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn detection_base_url(mut self, url: &str) -> Self {
        self.config.detection_base_url = Url::parse(url).unwrap();
        self
    }

    pub fn push_endpoint(mut self, url: &str) -> Self {
        self.config.push_endpoint = Url::parse(url).unwrap();
        self
    }

    pub fn device_token(mut self, token: &str) -> Self {
        self.config.device_token = Some(token.to_string());
        self
    }

    pub fn poll_interval(mut self, interval_ms: u64) -> Self {
        self.config.poll_interval_ms = Duration::from_millis(interval_ms);
        self
    }

    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity;
        self
    }

    pub fn notify_policy(mut self, policy: NotifyPolicy) -> Self {
        self.config.notify_policy = policy;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
