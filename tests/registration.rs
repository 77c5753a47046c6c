//! Integration tests for device token registration.

use std::time::Duration;

use doorwatch::{
    config::HttpRetryConfig,
    http_client::create_retryable_http_client,
    registration::{RegistrationError, register_device_token},
};
use serde_json::json;
use url::Url;

fn no_retry() -> HttpRetryConfig {
    HttpRetryConfig {
        max_retries: 0,
        initial_backoff_ms: Duration::from_millis(1),
        max_backoff_secs: Duration::from_millis(10),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_register_device_token_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/register_token")
        .match_body(mockito::Matcher::Json(json!({ "token": "ExponentPushToken[abc]" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{ "status": "success", "message": "Token registered" }"#)
        .create_async()
        .await;

    let client = create_retryable_http_client(&no_retry(), Duration::from_secs(2)).unwrap();
    let base = Url::parse(&server.url()).unwrap();

    register_device_token(&base, &client, "ExponentPushToken[abc]").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_register_device_token_rejected_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/register_token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{ "status": "error", "message": "No token" }"#)
        .create_async()
        .await;

    let client = create_retryable_http_client(&no_retry(), Duration::from_secs(2)).unwrap();
    let base = Url::parse(&server.url()).unwrap();

    let err = register_device_token(&base, &client, "ExponentPushToken[abc]").await.unwrap_err();
    assert!(matches!(err, RegistrationError::Rejected(message) if message == "No token"));
}

#[tokio::test]
async fn test_register_device_token_http_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/register_token")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{ "status": "error", "message": "No token" }"#)
        .create_async()
        .await;

    let client = create_retryable_http_client(&no_retry(), Duration::from_secs(2)).unwrap();
    let base = Url::parse(&server.url()).unwrap();

    let err = register_device_token(&base, &client, "ExponentPushToken[abc]").await.unwrap_err();
    assert!(matches!(err, RegistrationError::Http(status) if status.as_u16() == 400));
}
