//! Client for the remote detection endpoint.

mod http;
mod traits;

pub use http::HttpDetectionSource;
pub use traits::{DetectionSource, FetchError};

#[cfg(test)]
pub use traits::MockDetectionSource;
