//! Administrative endpoints for server management.

use axum::{Json, extract::State, http::StatusCode};
use log::info;
use serde::Serialize;
use sse_hub::AppState;

#[derive(Debug, Serialize)]
pub struct ShutdownResponse {
    pub status: String,
    pub message: String,
}

/// Graceful shutdown endpoint.
///
/// Closes every subscriber outbox (ending all open event streams) and
/// signals the server to stop accepting connections.
pub async fn shutdown_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<ShutdownResponse>) {
    info!("Graceful shutdown requested via HTTP");

    let was_running = !state.shutdown.is_shutdown();
    state.registry.shutdown().await;

    let message = if was_running {
        "Shutdown initiated, all event streams closed"
    } else {
        "Shutdown already in progress"
    };

    (
        StatusCode::ACCEPTED,
        Json(ShutdownResponse {
            status: "ok".to_string(),
            message: message.to_string(),
        }),
    )
}
