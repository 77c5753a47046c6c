//! One-shot registration of the device push token with the detection
//! backend.

use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Errors that can occur while registering the device push token.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Transport-level failure, including the request timeout elapsing.
    #[error("request error: {0}")]
    Request(#[from] reqwest_middleware::Error),

    /// The backend answered with a non-2xx HTTP status.
    #[error("registration endpoint returned HTTP {0}")]
    Http(StatusCode),

    /// The backend answered but did not accept the token.
    #[error("registration rejected: {0}")]
    Rejected(String),

    /// The response body was not the expected JSON shape.
    #[error("malformed registration response: {0}")]
    Malformed(String),
}

/// Wire format of the registration endpoint's response body.
#[derive(Debug, Deserialize)]
struct RegistrationResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Registers the device push token via `POST {base}/register_token`.
///
/// This is a one-shot startup task, causally independent of the alert
/// pipeline: a failure is reported to the caller and logged, but polling
/// starts regardless. Alerts stay visible; only push delivery is affected.
pub async fn register_device_token(
    base_url: &Url,
    client: &ClientWithMiddleware,
    device_token: &str,
) -> Result<(), RegistrationError> {
    let url = base_url
        .join("register_token")
        .map_err(|e| RegistrationError::Malformed(format!("invalid base URL: {e}")))?;

    let response = client
        .post(url)
        .json(&serde_json::json!({ "token": device_token }))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(RegistrationError::Http(status));
    }

    let body: RegistrationResponse = response
        .json()
        .await
        .map_err(|e| RegistrationError::Malformed(e.to_string()))?;

    if body.status != "success" {
        return Err(RegistrationError::Rejected(
            body.message.unwrap_or(body.status),
        ));
    }

    tracing::info!("Device push token registered with detection backend.");
    Ok(())
}
