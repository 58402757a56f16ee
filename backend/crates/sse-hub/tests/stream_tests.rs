mod common;

use common::{next_chunk, spawn_registry, stream_router, wait_for_count};

use axum::{
    body::Body,
    http::{Request, StatusCode, Version, header},
    response::Response,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

fn events_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn given_stream_request_when_opened_then_event_stream_headers() {
    // Given
    let registry = spawn_registry();
    let app = stream_router(registry.clone());

    // When
    let response = app.oneshot(events_request("/events")).await.unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "text/event-stream");
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    assert_eq!(headers[header::CONNECTION], "keep-alive");
    assert_eq!(registry.client_count().await, 1);
}

#[tokio::test]
async fn given_open_stream_when_broadcast_then_framed_event_written() {
    // Given
    let registry = spawn_registry();
    let app = stream_router(registry.clone());
    let response = app.oneshot(events_request("/events")).await.unwrap();
    let mut body = response.into_body();

    // When
    registry.broadcast_message("hello").await.unwrap();
    registry.broadcast_message("world").await.unwrap();

    // Then
    assert_eq!(next_chunk(&mut body).await.unwrap(), "data: hello\n\n");
    assert_eq!(next_chunk(&mut body).await.unwrap(), "data: world\n\n");
}

#[tokio::test]
async fn given_open_stream_when_client_disconnects_then_subscriber_removed() {
    // Given
    let registry = spawn_registry();
    let app = stream_router(registry.clone());
    let response = app.oneshot(events_request("/events")).await.unwrap();
    assert_eq!(registry.client_count().await, 1);

    // When - peer goes away
    drop(response);

    // Then
    wait_for_count(&registry, 0).await;
}

#[tokio::test]
async fn given_open_stream_when_removed_by_server_then_body_ends() {
    // Given
    let registry = spawn_registry();
    let app = stream_router(registry.clone());
    let response = app.oneshot(events_request("/events")).await.unwrap();
    let mut body = response.into_body();
    let id = registry.subscriber_ids().await.remove(0);

    // When
    registry.remove_client(&id).await.unwrap();

    // Then
    assert!(next_chunk(&mut body).await.is_none());
}

#[tokio::test]
async fn given_open_stream_when_registry_shut_down_then_body_ends() {
    let registry = spawn_registry();
    let app = stream_router(registry.clone());
    let response = app.oneshot(events_request("/events")).await.unwrap();
    let mut body = response.into_body();

    registry.shutdown().await;

    assert!(next_chunk(&mut body).await.is_none());
}

#[tokio::test]
async fn given_buffer_query_when_opened_then_capacity_applied() {
    let registry = spawn_registry();
    let app = stream_router(registry.clone());

    let _response = app.oneshot(events_request("/events?buffer=1")).await.unwrap();
    registry.broadcast_message("first").await.unwrap();
    let second = registry.broadcast_message("second").await;

    assert!(second.is_err());
}

#[tokio::test]
async fn given_zero_buffer_when_opened_then_bad_request() {
    let registry = spawn_registry();
    let app = stream_router(registry.clone());

    let response = app.oneshot(events_request("/events?buffer=0")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "INVALID_CAPACITY");
    assert_eq!(json["error"]["field"], "buffer");
    assert_eq!(registry.client_count().await, 0);
}

#[tokio::test]
async fn given_http10_request_when_opened_then_streaming_unsupported() {
    // Given
    let registry = spawn_registry();
    let app = stream_router(registry.clone());
    let request = Request::builder()
        .uri("/events")
        .version(Version::HTTP_10)
        .body(Body::empty())
        .unwrap();

    // When
    let response = app.oneshot(request).await.unwrap();

    // Then - nothing registered
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "STREAMING_UNSUPPORTED");
    assert_eq!(json["error"]["message"], "Streaming unsupported!");
    assert!(json["error"].get("field").is_none());
    assert_eq!(registry.client_count().await, 0);
}

#[tokio::test]
async fn given_shutdown_registry_when_opened_then_service_unavailable() {
    let registry = spawn_registry();
    registry.shutdown().await;
    let app = stream_router(registry);

    let response = app.oneshot(events_request("/events")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "REGISTRY_CLOSED");
}
