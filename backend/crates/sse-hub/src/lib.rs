pub mod app_state;
pub mod broadcast_report;
pub mod client_registry;
mod delivery;
pub mod error;
pub mod event_stream;
pub mod id_generator;
pub mod metrics;
pub mod registry_config;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
mod subscriber;
pub mod subscriber_id;

pub use app_state::{
    AppState, StreamError, StreamErrorBody, StreamParams, handler, status_for,
};
pub use broadcast_report::BroadcastReport;
pub use client_registry::{ClientRegistry, RegistryLoop};
pub use error::{HubError, Result};
pub use event_stream::{
    EVENT_STREAM_CONTENT_TYPE, ensure_streaming_transport, frame_event, subscriber_stream,
};
pub use id_generator::{EntropySource, IdGenerator, MAX_ID_ATTEMPTS, OsEntropy};
pub use metrics::Metrics;
pub use registry_config::RegistryConfig;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use subscriber::Subscriber;
pub use subscriber_id::SubscriberId;

#[cfg(test)]
mod tests;

use tracing::info_span;

/// Create a tracing span for one subscriber's event stream.
pub fn create_stream_span(subscriber_id: &SubscriberId) -> tracing::Span {
    info_span!("sse_stream", subscriber_id = %subscriber_id)
}
