//! Data models for Doorwatch.

pub mod alert;
pub mod detection;
pub mod push;

pub use alert::{Alert, AlertIdentity, AlertParseError, UNKNOWN_SUBJECT};
pub use detection::{DetectedFaceRecord, DetectionResponse};
pub use push::{PushData, PushMessage};
