//! A set of helpers for testing

use chrono::{DateTime, Utc};
use url::Url;

use crate::models::{Alert, UNKNOWN_SUBJECT};

/// A builder for creating `Alert` instances for testing.
#[derive(Debug, Clone)]
pub struct AlertBuilder {
    subject: String,
    timestamp: DateTime<Utc>,
    image_url: Option<Url>,
    video_url: Option<Url>,
}

impl Default for AlertBuilder {
    fn default() -> Self {
        Self {
            subject: UNKNOWN_SUBJECT.to_string(),
            timestamp: DateTime::UNIX_EPOCH,
            image_url: None,
            video_url: None,
        }
    }
}

impl AlertBuilder {
    /// Creates a new `AlertBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the subject name.
    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }

    /// Sets the timestamp to the given number of seconds past the epoch.
    pub fn timestamp_secs(mut self, secs: i64) -> Self {
        self.timestamp = DateTime::from_timestamp(secs, 0).expect("in-range test timestamp");
        self
    }

    /// Sets the still image URL.
    pub fn image_url(mut self, url: &str) -> Self {
        self.image_url = Some(Url::parse(url).expect("valid test URL"));
        self
    }

    /// Sets the video evidence URL.
    pub fn video_url(mut self, url: &str) -> Self {
        self.video_url = Some(Url::parse(url).expect("valid test URL"));
        self
    }

    /// Builds the `Alert` with the provided or default values.
    pub fn build(self) -> Alert {
        Alert {
            subject: self.subject,
            timestamp: self.timestamp,
            image_url: self.image_url,
            video_url: self.video_url,
        }
    }
}
