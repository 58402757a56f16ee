use sse_hub::{AppState, ClientRegistry, Metrics, ShutdownCoordinator};
use sse_server::error::Result as ServerResult;
use sse_server::{build_router, logger, registry_config};

use log::{error, info};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ServerResult<()> {
    // Load and validate configuration
    let config = sse_config::Config::load()?;
    config.validate()?;

    // Initialize logger (before any other logging)
    let log_file_path = config.log_file_path()?;
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting sse-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // One coordinator drives the registry loop, readiness and the HTTP server
    let shutdown = ShutdownCoordinator::new();
    let registry = ClientRegistry::spawn(registry_config(&config.hub), shutdown.clone())?;

    let app_state = AppState {
        registry: registry.clone(),
        metrics: Metrics::new(),
        shutdown: shutdown.clone(),
    };

    let app = build_router(app_state);

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;

    // Get actual bound address (important when port is 0 / auto-assigned)
    let actual_addr = listener.local_addr()?;
    info!("Server listening on {}", actual_addr);

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.subscribe_guard().wait().await;
            // Open event streams only end once their outboxes are closed
            registry.shutdown().await;
            info!("All subscribers closed, draining connections");
        })
        .await?;

    info!("Graceful shutdown complete");

    Ok(())
}
