use crate::event_stream::{EVENT_STREAM_CONTENT_TYPE, ensure_streaming_transport};
use crate::{ClientRegistry, HubError, Metrics, ShutdownCoordinator, subscriber_stream};

use axum::{
    Json,
    body::Body,
    extract::{Query, State},
    http::{StatusCode, Version, header},
    response::{IntoResponse, Response},
};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

/// Shared application state for the event stream handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: ClientRegistry,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
}

/// Query parameters accepted by the stream endpoint
#[derive(Debug, Default, Deserialize)]
pub struct StreamParams {
    /// Outbox capacity for this subscriber; registry default when absent
    pub buffer: Option<usize>,
}

/// Rejected stream request, rendered as `{"error":{"code","message","field?"}}`
#[derive(Debug, Serialize)]
pub struct StreamError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: StreamErrorBody,
}

#[derive(Debug, Serialize)]
pub struct StreamErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl StreamError {
    fn new(status: StatusCode, code: &str, message: String, field: Option<String>) -> Self {
        Self {
            status,
            error: StreamErrorBody {
                code: code.to_string(),
                message,
                field,
            },
        }
    }
}

impl From<HubError> for StreamError {
    fn from(e: HubError) -> Self {
        let status = status_for(&e);
        let code = e.error_code();

        match e {
            HubError::TransportUnsupported { .. } => {
                Self::new(status, code, "Streaming unsupported!".to_string(), None)
            }
            HubError::InvalidCapacity { requested, max, .. } => Self::new(
                status,
                code,
                format!("buffer must be 1-{max}, got {requested}"),
                Some("buffer".to_string()),
            ),
            HubError::ValidationError { message, field, .. } => {
                Self::new(status, code, message, field)
            }
            HubError::Closed { .. } => {
                Self::new(status, code, "Registry is shut down".to_string(), None)
            }
            other => Self::new(status, code, other.to_string(), None),
        }
    }
}

impl IntoResponse for StreamError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Event stream handler: registers a subscriber and streams its outbox
pub async fn handler(
    State(state): State<AppState>,
    version: Version,
    Query(params): Query<StreamParams>,
) -> Result<Response, StreamError> {
    ensure_streaming_transport(version).inspect_err(|e| {
        warn!("Rejected event stream request: {e}");
    })?;

    let subscriber = match params.buffer {
        Some(capacity) => state.registry.add_client_with_capacity(capacity).await,
        None => state.registry.add_client().await,
    }
    .inspect_err(|e| {
        error!("Failed to register subscriber: {e}");
        state.metrics.error_occurred(e.error_code());
    })?;

    debug!("Opening event stream for subscriber {}", subscriber.id());

    let stream = subscriber_stream(state.registry.clone(), subscriber);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, EVENT_STREAM_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(stream))
        .map_err(|e| {
            error!("Failed to build event stream response: {e}");
            StreamError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                e.to_string(),
                None,
            )
        })
}

/// HTTP status for a registry error surfaced to a streaming client
pub fn status_for(error: &HubError) -> StatusCode {
    match error {
        HubError::NotFound { .. } => StatusCode::NOT_FOUND,
        HubError::NotReady { .. } => StatusCode::CONFLICT,
        HubError::Closed { .. } => StatusCode::SERVICE_UNAVAILABLE,
        HubError::InvalidCapacity { .. } | HubError::ValidationError { .. } => {
            StatusCode::BAD_REQUEST
        }
        HubError::TransportUnsupported { .. }
        | HubError::RandomnessFailure { .. }
        | HubError::IdCollision { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
