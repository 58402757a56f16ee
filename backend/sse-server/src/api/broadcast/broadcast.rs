//! Broadcast REST API handler

use crate::{ApiResult, BroadcastResponse};

use sse_hub::AppState;

use axum::{Json, extract::State};
use bytes::Bytes;
use log::info;

/// POST /api/broadcast
///
/// The raw request body is the payload. Slow subscribers are reported in
/// `failed` rather than failing the request.
pub async fn broadcast(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<BroadcastResponse>> {
    let report = state.registry.broadcast_report(body).await?;

    info!(
        "Broadcast delivered to {} subscribers, {} missed",
        report.delivered,
        report.failed.len()
    );

    Ok(Json(BroadcastResponse::from(report)))
}
