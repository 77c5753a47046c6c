//! Construction of the push-relay payload for an alert.

use crate::models::{Alert, PushData, PushMessage};

/// Builds the push message for an alert.
///
/// The data section carries the fields that determine the alert's identity
/// (`timestamp`, `name`) plus the video reference, so a tapped notification
/// can deep-link to the matching alert.
pub fn build_push_message(alert: &Alert, device_token: &str) -> PushMessage {
    PushMessage {
        to: device_token.to_string(),
        sound: "default".to_string(),
        title: "Motion Detected".to_string(),
        body: format!("{} detected", alert.subject),
        data: PushData {
            name: alert.subject.clone(),
            timestamp: alert.timestamp,
            video: alert.video_url.clone(),
        },
    }
}
