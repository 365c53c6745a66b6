//! FCM channel tests against a mock HTTP server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopnotify_core::traits::PushChannel;
use shopnotify_push::{FcmPushChannel, TokenSource};

fn channel(server: &MockServer) -> FcmPushChannel {
    FcmPushChannel::new(
        server.uri(),
        "shop-demo",
        TokenSource::Static("test-token".into()),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_successful_send_returns_message_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/shop-demo/messages:send"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "message": {
                "token": "device-1",
                "notification": { "title": "Hello", "body": "World" }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "projects/shop-demo/messages/42" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = channel(&server).send("device-1", "Hello", "World").await;
    assert!(result.success);
    assert_eq!(
        result.message_id.as_deref(),
        Some("projects/shop-demo/messages/42")
    );
}

#[tokio::test]
async fn test_api_error_is_reported_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("UNREGISTERED"))
        .mount(&server)
        .await;

    let result = channel(&server).send("stale", "Hi", "There").await;
    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.contains("404"));
    assert!(error.contains("UNREGISTERED"));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_reported_not_raised() {
    let channel = FcmPushChannel::new(
        "http://127.0.0.1:1",
        "shop-demo",
        TokenSource::Static("t".into()),
        Duration::from_secs(1),
    )
    .unwrap();

    let result = channel.send("device-1", "Hi", "There").await;
    assert!(!result.success);
    assert!(result.error.is_some());
}
