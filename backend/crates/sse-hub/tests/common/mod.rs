#![allow(dead_code)]

use sse_hub::{AppState, ClientRegistry, Metrics, RegistryConfig, ShutdownCoordinator, handler};

use axum::{Router, body::Body, routing::get};
use bytes::Bytes;
use http_body_util::BodyExt;
use tokio::time::{Duration, sleep, timeout};

/// Registry with its control loop running on the test runtime
pub fn spawn_registry() -> ClientRegistry {
    spawn_registry_with_config(RegistryConfig::default())
}

pub fn spawn_registry_with_config(config: RegistryConfig) -> ClientRegistry {
    ClientRegistry::spawn(config, ShutdownCoordinator::new()).expect("Valid registry config")
}

/// Router exposing only the event stream endpoint
pub fn stream_router(registry: ClientRegistry) -> Router {
    let shutdown = ShutdownCoordinator::new();
    let state = AppState {
        registry,
        metrics: Metrics::new(),
        shutdown,
    };

    Router::new()
        .route("/events", get(handler))
        .with_state(state)
}

/// Read the next data frame from a streaming body, failing after one second
pub async fn next_chunk(body: &mut Body) -> Option<Bytes> {
    let frame = timeout(Duration::from_secs(1), body.frame())
        .await
        .expect("Timed out waiting for event")?;

    frame.expect("Body error").into_data().ok()
}

/// Poll until the registry holds `expected` subscribers
pub async fn wait_for_count(registry: &ClientRegistry, expected: usize) {
    for _ in 0..100 {
        if registry.client_count().await == expected {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "Expected {expected} subscribers, found {}",
        registry.client_count().await
    );
}
