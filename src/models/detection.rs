//! Wire-format types for the detection endpoint.

use serde::Deserialize;
use url::Url;

use super::alert::{Alert, AlertParseError, UNKNOWN_SUBJECT, parse_timestamp, resolve_media_ref};

/// The top-level JSON body returned by `GET {base}/detect`.
#[derive(Debug, Deserialize)]
pub struct DetectionResponse {
    /// `"success"`, or an error marker.
    pub status: String,
    /// The raw detection records. Absent on rejection responses.
    #[serde(default)]
    pub detected_faces: Vec<DetectedFaceRecord>,
    /// Human-readable rejection message, when `status != "success"`.
    #[serde(default)]
    pub message: Option<String>,
}

/// One raw detection record as returned by the endpoint.
///
/// Every field is optional on the wire; only the timestamp is required to
/// build an [`Alert`].
#[derive(Debug, Deserialize)]
pub struct DetectedFaceRecord {
    /// Recognized subject name.
    pub name: Option<String>,
    /// ISO-like timestamp string.
    pub timestamp: Option<String>,
    /// Still image path or URL.
    pub image: Option<String>,
    /// Video evidence path or URL.
    pub video: Option<String>,
}

impl DetectedFaceRecord {
    /// Converts the raw record into an [`Alert`], resolving relative media
    /// references against `base`.
    pub fn into_alert(self, base: &Url) -> Result<Alert, AlertParseError> {
        let raw_ts = self.timestamp.ok_or(AlertParseError::MissingTimestamp)?;
        let timestamp = parse_timestamp(&raw_ts)?;
        let image_url =
            self.image.as_deref().map(|raw| resolve_media_ref(base, raw)).transpose()?;
        let video_url =
            self.video.as_deref().map(|raw| resolve_media_ref(base, raw)).transpose()?;
        Ok(Alert {
            subject: self.name.unwrap_or_else(|| UNKNOWN_SUBJECT.to_string()),
            timestamp,
            image_url,
            video_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://camera.local:5000/detect").unwrap()
    }

    #[test]
    fn test_into_alert_full_record() {
        let record = DetectedFaceRecord {
            name: Some("alice".to_string()),
            timestamp: Some("2025-06-01T10:30:00".to_string()),
            image: Some("/static/images/a.jpg".to_string()),
            video: Some("/static/videos/a.mp4".to_string()),
        };
        let alert = record.into_alert(&base()).unwrap();
        assert_eq!(alert.subject, "alice");
        assert_eq!(
            alert.image_url.unwrap().as_str(),
            "http://camera.local:5000/static/images/a.jpg"
        );
        assert_eq!(
            alert.video_url.unwrap().as_str(),
            "http://camera.local:5000/static/videos/a.mp4"
        );
    }

    #[test]
    fn test_into_alert_missing_name_falls_back_to_unknown() {
        let record = DetectedFaceRecord {
            name: None,
            timestamp: Some("2025-06-01T10:30:00".to_string()),
            image: None,
            video: None,
        };
        let alert = record.into_alert(&base()).unwrap();
        assert_eq!(alert.subject, UNKNOWN_SUBJECT);
    }

    #[test]
    fn test_into_alert_missing_timestamp_is_an_error() {
        let record = DetectedFaceRecord {
            name: Some("alice".to_string()),
            timestamp: None,
            image: None,
            video: None,
        };
        assert_eq!(record.into_alert(&base()), Err(AlertParseError::MissingTimestamp));
    }
}
