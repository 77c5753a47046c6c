//! Data models for push notifications.

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

/// The payload POSTed to the push-relay service.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PushMessage {
    /// The registered device push token.
    pub to: String,
    /// Notification sound hint.
    pub sound: String,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Alert fields carried along so a tapped notification can deep-link
    /// back to the matching alert.
    pub data: PushData,
}

/// The data section of a push message.
///
/// Carries the fields that reconstitute the alert's identity on the
/// receiving side: `(timestamp, name)` plus the video reference.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PushData {
    /// The alert's subject name.
    pub name: String,
    /// The alert's timestamp.
    pub timestamp: DateTime<Utc>,
    /// Video evidence URL, if any.
    pub video: Option<Url>,
}
