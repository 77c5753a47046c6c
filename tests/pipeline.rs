//! End-to-end pipeline tests against mock HTTP servers.

use std::{sync::Arc, time::Duration};

use doorwatch::{
    config::{AppConfig, HttpRetryConfig},
    detection::HttpDetectionSource,
    http_client::create_retryable_http_client,
    notification::ExpoPushNotifier,
    pipeline::{AlertPipeline, PipelineHandle, PollState},
};
use url::Url;

fn no_retry() -> HttpRetryConfig {
    HttpRetryConfig {
        max_retries: 0,
        initial_backoff_ms: Duration::from_millis(1),
        max_backoff_secs: Duration::from_millis(10),
        ..Default::default()
    }
}

fn start_pipeline(
    detection_server: &mockito::ServerGuard,
    push_server: &mockito::ServerGuard,
) -> PipelineHandle {
    let config = Arc::new(AppConfig {
        detection_base_url: Url::parse(&detection_server.url()).unwrap(),
        push_endpoint: Url::parse(&push_server.url()).unwrap(),
        device_token: Some("ExponentPushToken[e2e]".to_string()),
        poll_interval_ms: Duration::from_millis(50),
        request_timeout_secs: Duration::from_secs(2),
        buffer_capacity: 50,
        http_retry_config: no_retry(),
        ..Default::default()
    });

    let client = Arc::new(
        create_retryable_http_client(&config.http_retry_config, config.request_timeout_secs)
            .unwrap(),
    );
    let source = Arc::new(
        HttpDetectionSource::new(config.detection_base_url.clone(), Arc::clone(&client))
            .unwrap(),
    );
    let notifier = Arc::new(ExpoPushNotifier::new(config.push_endpoint.clone(), client));

    AlertPipeline::new(config, source, notifier).start()
}

#[tokio::test]
async fn test_pipeline_ingests_and_notifies_end_to_end() {
    let mut detection_server = mockito::Server::new_async().await;
    detection_server
        .mock("GET", "/detect")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "status": "success",
                "detected_faces": [
                    { "name": "bob", "timestamp": "2025-06-01T10:30:05", "video": "/static/videos/b.mp4" },
                    { "name": "alice", "timestamp": "2025-06-01T10:30:00" }
                ]
            }"#,
        )
        .create_async()
        .await;

    let mut push_server = mockito::Server::new_async().await;
    // Only the newest new alert of the cycle is dispatched, and repeat
    // cycles with the same batch must not renotify.
    let push_mock = push_server
        .mock("POST", "/")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "data": { "name": "bob" }
        })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let handle = start_pipeline(&detection_server, &push_server);

    let mut status_rx = handle.subscribe();
    status_rx.wait_for(|s| s.cycles_completed >= 3).await.unwrap();

    let snapshot = handle.snapshot().await;
    let subjects: Vec<_> = snapshot.iter().map(|a| a.subject.clone()).collect();
    assert_eq!(subjects, vec!["bob", "alice"]);

    handle.stop().await;
    push_mock.assert_async().await;
}

#[tokio::test]
async fn test_pipeline_surfaces_failure_and_recovers_on_refresh() {
    let mut detection_server = mockito::Server::new_async().await;
    let failure_mock = detection_server
        .mock("GET", "/detect")
        .with_status(500)
        .create_async()
        .await;

    let push_server = mockito::Server::new_async().await;
    let handle = start_pipeline(&detection_server, &push_server);

    let mut status_rx = handle.subscribe();
    let status = status_rx.wait_for(|s| s.state == PollState::Failed).await.unwrap().clone();
    assert!(status.last_error.is_some());
    assert!(handle.snapshot().await.is_empty());

    // Endpoint recovers; a manual refresh picks the new data up.
    failure_mock.remove_async().await;
    detection_server
        .mock("GET", "/detect")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "status": "success",
                "detected_faces": [
                    { "name": "alice", "timestamp": "2025-06-01T10:30:00" }
                ]
            }"#,
        )
        .create_async()
        .await;

    handle.refresh();
    status_rx.wait_for(|s| s.state == PollState::Idle && s.last_error.is_none()).await.unwrap();

    let snapshot = handle.snapshot().await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].subject, "alice");

    handle.stop().await;
}
