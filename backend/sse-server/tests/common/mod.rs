#![allow(dead_code)]

//! Test infrastructure for sse-server API tests

use sse_hub::{AppState, ClientRegistry, Metrics, RegistryConfig, ShutdownCoordinator};
use sse_server::build_router;

use axum_test::TestServer;

/// AppState whose registry and readiness share one shutdown coordinator
pub fn create_test_app_state() -> AppState {
    create_test_app_state_with_config(RegistryConfig::default())
}

pub fn create_test_app_state_with_config(config: RegistryConfig) -> AppState {
    let shutdown = ShutdownCoordinator::new();
    let registry =
        ClientRegistry::spawn(config, shutdown.clone()).expect("Valid registry config");

    AppState {
        registry,
        metrics: Metrics::new(),
        shutdown,
    }
}

pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
}

/// Create a TestServer over the full router
pub fn create_test_server() -> TestServerWithState {
    let app_state = create_test_app_state();
    let server = TestServer::builder()
        .http_transport()
        .build(build_router(app_state.clone()))
        .expect("Failed to create test server");

    TestServerWithState { server, app_state }
}
