pub mod admin;
pub mod api;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;

#[cfg(test)]
mod tests;

pub use api::{
    broadcast::{broadcast::broadcast, broadcast_response::BroadcastResponse},
    clients::{
        client_list_response::ClientListResponse,
        clients::{list_clients, send_to_client},
    },
    error::ApiError,
    error::Result as ApiResult,
};

pub use crate::routes::build_router;

use sse_config::HubConfig;
use sse_hub::RegistryConfig;

/// Registry tuning from the `[hub]` config section
pub fn registry_config(hub: &HubConfig) -> RegistryConfig {
    RegistryConfig {
        default_buffer_size: hub.default_buffer_size,
        max_buffer_size: hub.max_buffer_size,
        id_length: hub.id_length,
        command_queue_capacity: hub.command_queue_capacity,
    }
}
