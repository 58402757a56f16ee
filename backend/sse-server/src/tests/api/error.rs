use crate::ApiError;

use sse_hub::{HubError, SubscriberId};

use std::panic::Location;

use axum::response::{IntoResponse, Response};
use error_location::ErrorLocation;
use http::StatusCode;
use http_body_util::BodyExt;

async fn json_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn subscriber_id() -> SubscriberId {
    SubscriberId::parse("abc123").unwrap()
}

#[tokio::test]
async fn given_hub_not_found_when_converted_then_404_with_client_message() {
    let error = ApiError::from(HubError::NotFound {
        subscriber_id: subscriber_id(),
        location: ErrorLocation::from(Location::caller()),
    });
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "NOT_FOUND");
    assert_eq!(json["error"]["message"], "client abc123 not found");
}

#[tokio::test]
async fn given_hub_not_ready_when_converted_then_409_slow_client() {
    let error = ApiError::from(HubError::NotReady {
        subscriber_id: subscriber_id(),
        location: ErrorLocation::from(Location::caller()),
    });
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "SLOW_CLIENT");
    assert_eq!(
        json["error"]["message"],
        "client abc123 not ready to receive messages"
    );
}

#[tokio::test]
async fn given_hub_closed_when_converted_then_503() {
    let error = ApiError::from(HubError::Closed {
        location: ErrorLocation::from(Location::caller()),
    });
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response).await["error"]["code"], "REGISTRY_CLOSED");
}

#[tokio::test]
async fn given_invalid_capacity_when_converted_then_400_with_buffer_field() {
    let error = ApiError::from(HubError::InvalidCapacity {
        requested: 0,
        max: 1000,
        location: ErrorLocation::from(Location::caller()),
    });
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["field"], "buffer");
}

#[tokio::test]
async fn given_randomness_failure_when_converted_then_500_keeps_code() {
    let error = ApiError::from(HubError::RandomnessFailure {
        message: "no entropy".into(),
        location: ErrorLocation::from(Location::caller()),
    });
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await["error"]["code"],
        "RANDOMNESS_FAILURE"
    );
}

#[tokio::test]
async fn given_error_without_field_when_serialized_then_field_omitted() {
    let error = ApiError::NotFound {
        message: "gone".into(),
        location: ErrorLocation::from(Location::caller()),
    };

    let json = json_body(error.into_response()).await;

    assert!(json["error"].get("field").is_none());
}
