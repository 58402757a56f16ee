//! Client REST API handlers

use crate::{ApiResult, ClientListResponse};

use sse_hub::{AppState, SubscriberId};

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bytes::Bytes;
use log::debug;

/// GET /api/clients
pub async fn list_clients(State(state): State<AppState>) -> Json<ClientListResponse> {
    let ids = state.registry.subscriber_ids().await;

    Json(ClientListResponse {
        count: ids.len(),
        ids,
    })
}

/// POST /api/clients/{client_id}/messages
pub async fn send_to_client(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let subscriber_id = SubscriberId::parse(&client_id)?;

    state
        .registry
        .send_message_to_client(&subscriber_id, body)
        .await?;

    debug!("Queued message for subscriber {subscriber_id}");

    Ok(StatusCode::ACCEPTED)
}
