//! The core alert model and its identity key.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Sentinel subject name used when the detection service omits one.
pub const UNKNOWN_SUBJECT: &str = "Unknown";

/// Errors that can occur when converting a raw detection record into an
/// [`Alert`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlertParseError {
    /// The record carried no timestamp at all.
    #[error("record has no timestamp")]
    MissingTimestamp,

    /// The timestamp string could not be parsed as an instant.
    #[error("unparseable timestamp: {0}")]
    BadTimestamp(String),

    /// A media reference could not be resolved to a URL.
    #[error("unresolvable media reference: {0}")]
    BadMediaRef(String),
}

/// The compound natural key of an alert.
///
/// The detection endpoint's only reliable field is the timestamp, and
/// timestamps collide when several subjects are detected in the same
/// instant, so uniqueness is decided on the `(timestamp, subject)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertIdentity {
    /// The instant the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// The recognized subject, or the [`UNKNOWN_SUBJECT`] sentinel.
    pub subject: String,
}

/// One detection event.
///
/// Alerts are immutable values: once admitted to the buffer they are never
/// mutated, only evicted by capacity overflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// The recognized subject, or [`UNKNOWN_SUBJECT`].
    pub subject: String,
    /// The instant the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// Resolved URL of a still image of the detection, if any.
    pub image_url: Option<Url>,
    /// Resolved URL of associated video evidence, if any.
    pub video_url: Option<Url>,
}

impl Alert {
    /// Returns the identity used for deduplication.
    pub fn identity(&self) -> AlertIdentity {
        AlertIdentity { timestamp: self.timestamp, subject: self.subject.clone() }
    }
}

/// Parses the detection endpoint's timestamp strings.
///
/// The endpoint emits ISO-like strings, sometimes without a timezone
/// offset; naive timestamps are taken as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AlertParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| AlertParseError::BadTimestamp(raw.to_string()))
}

/// Resolves a media reference against the detection endpoint's origin.
///
/// Absolute URLs pass through unchanged; relative paths are joined onto
/// `base`.
pub(crate) fn resolve_media_ref(base: &Url, raw: &str) -> Result<Url, AlertParseError> {
    base.join(raw).map_err(|_| AlertParseError::BadMediaRef(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let dt = parse_timestamp("2025-06-01T10:30:00+00:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-06-01T10:30:00+00:00");
    }

    #[test]
    fn test_parse_timestamp_naive_iso() {
        // The detection server emits `datetime.now().isoformat()`, which has
        // no offset and microsecond precision.
        let dt = parse_timestamp("2025-06-01T10:30:00.123456").unwrap();
        assert_eq!(dt.timestamp_subsec_micros(), 123_456);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(
            parse_timestamp("yesterday"),
            Err(AlertParseError::BadTimestamp("yesterday".to_string()))
        );
    }

    #[test]
    fn test_resolve_media_ref_relative() {
        let base = Url::parse("http://192.168.1.20:5000/detect").unwrap();
        let url = resolve_media_ref(&base, "/static/images/a.jpg").unwrap();
        assert_eq!(url.as_str(), "http://192.168.1.20:5000/static/images/a.jpg");
    }

    #[test]
    fn test_resolve_media_ref_absolute_passthrough() {
        let base = Url::parse("http://192.168.1.20:5000/detect").unwrap();
        let url = resolve_media_ref(&base, "https://cdn.example.com/v.mp4").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/v.mp4");
    }

    #[test]
    fn test_identity_distinguishes_subjects_with_equal_timestamps() {
        let ts = parse_timestamp("2025-06-01T10:30:00").unwrap();
        let a = Alert {
            subject: "alice".to_string(),
            timestamp: ts,
            image_url: None,
            video_url: None,
        };
        let b = Alert { subject: "bob".to_string(), ..a.clone() };
        assert_ne!(a.identity(), b.identity());
    }
}
