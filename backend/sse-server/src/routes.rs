use crate::{admin, broadcast, health, list_clients, send_to_client};

use sse_hub::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Event stream endpoint
        .route("/events", get(sse_hub::handler))
        // Publish endpoints
        .route("/api/broadcast", post(broadcast))
        .route("/api/clients", get(list_clients))
        .route("/api/clients/{client_id}/messages", post(send_to_client))
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        // Admin endpoints
        .route("/admin/shutdown", post(admin::shutdown_handler))
        .with_state(state)
        // Browsers open EventSource cross-origin
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
