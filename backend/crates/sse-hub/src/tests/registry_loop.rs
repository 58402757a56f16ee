use crate::{
    ClientRegistry, EntropySource, HubError, IdGenerator, OsEntropy, RegistryConfig,
    ShutdownCoordinator, SubscriberId,
};

use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use tokio::time::{Duration, timeout};

fn registry_with_loop() -> (ClientRegistry, crate::RegistryLoop) {
    ClientRegistry::new(RegistryConfig::default(), ShutdownCoordinator::new()).unwrap()
}

/// Fails the first fill, then defers to the OS
struct FailOnceEntropy {
    failed: AtomicBool,
}

impl EntropySource for FailOnceEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), String> {
        if !self.failed.swap(true, Ordering::SeqCst) {
            return Err("entropy pool unavailable".to_string());
        }
        OsEntropy.fill(buf)
    }
}

fn rejected_field(config: RegistryConfig) -> Option<String> {
    match ClientRegistry::new(config, ShutdownCoordinator::new()) {
        Err(HubError::ValidationError { field, .. }) => field,
        Err(other) => panic!("Expected ValidationError, got {other}"),
        Ok(_) => panic!("Expected config to be rejected"),
    }
}

#[tokio::test]
async fn given_add_abandoned_before_reply_when_loop_runs_then_entry_not_orphaned() {
    let (registry, registry_loop) = registry_with_loop();

    // Queue the add, then give up on it before the loop is running.
    let abandoned = registry.add_client().now_or_never();
    assert!(abandoned.is_none());

    tokio::spawn(registry_loop.run());

    // Remove is applied after the queued add, so the add has been handled by now.
    let unknown = SubscriberId::parse("unknown").unwrap();
    assert!(!registry.remove_client(&unknown).await.unwrap());
    assert_eq!(registry.client_count().await, 0);
}

#[tokio::test]
async fn given_every_handle_dropped_when_loop_running_then_loop_exits() {
    let (registry, registry_loop) = registry_with_loop();
    let handle = tokio::spawn(registry_loop.run());

    drop(registry);

    let result = timeout(Duration::from_millis(500), handle).await;
    assert!(result.is_ok(), "Loop should stop once no handle can send");
}

#[tokio::test]
async fn given_shutdown_when_loop_stops_then_registry_empty_and_closed() {
    let (registry, registry_loop) = registry_with_loop();
    let handle = tokio::spawn(registry_loop.run());

    let mut subscriber = registry.add_client().await.unwrap();
    registry.shutdown().await;

    assert!(handle.await.is_ok());
    assert_eq!(registry.client_count().await, 0);
    assert!(subscriber.recv().await.is_none());
    assert!(matches!(
        registry.add_client().await.unwrap_err(),
        HubError::Closed { .. }
    ));
}

#[tokio::test]
async fn given_capacity_out_of_range_when_added_then_invalid_capacity() {
    let registry = ClientRegistry::spawn(RegistryConfig::default(), ShutdownCoordinator::new())
        .unwrap();

    let zero = registry.add_client_with_capacity(0).await;
    let huge = registry
        .add_client_with_capacity(registry.config().max_buffer_size + 1)
        .await;

    assert!(matches!(zero.unwrap_err(), HubError::InvalidCapacity { requested: 0, .. }));
    assert!(matches!(huge.unwrap_err(), HubError::InvalidCapacity { .. }));
    assert_eq!(registry.client_count().await, 0);
}

#[tokio::test]
async fn given_custom_capacity_when_added_then_subscriber_reports_it() {
    let registry = ClientRegistry::spawn(RegistryConfig::default(), ShutdownCoordinator::new())
        .unwrap();

    let subscriber = registry.add_client_with_capacity(3).await.unwrap();

    assert_eq!(subscriber.capacity(), 3);
    assert_eq!(subscriber.connected_at(), subscriber.last_active_at());
}

#[test]
fn given_zero_command_queue_when_built_then_validation_error_instead_of_panic() {
    let config = RegistryConfig {
        command_queue_capacity: 0,
        ..RegistryConfig::default()
    };

    assert_eq!(
        rejected_field(config).as_deref(),
        Some("command_queue_capacity")
    );
}

#[test]
fn given_zero_id_length_when_built_then_validation_error() {
    let config = RegistryConfig {
        id_length: 0,
        ..RegistryConfig::default()
    };

    assert_eq!(rejected_field(config).as_deref(), Some("id_length"));
}

#[test]
fn given_default_buffer_out_of_range_when_built_then_validation_error() {
    let zero = RegistryConfig {
        default_buffer_size: 0,
        ..RegistryConfig::default()
    };
    let above_max = RegistryConfig {
        default_buffer_size: 50,
        max_buffer_size: 20,
        ..RegistryConfig::default()
    };

    assert_eq!(rejected_field(zero).as_deref(), Some("default_buffer_size"));
    assert_eq!(rejected_field(above_max).as_deref(), Some("max_buffer_size"));
}

#[tokio::test]
async fn given_invalid_config_when_spawned_then_error_returned() {
    let config = RegistryConfig {
        command_queue_capacity: 0,
        ..RegistryConfig::default()
    };

    let result = ClientRegistry::spawn(config, ShutdownCoordinator::new());

    assert!(matches!(result, Err(HubError::ValidationError { .. })));
}

#[tokio::test]
async fn given_entropy_fails_once_when_added_then_randomness_failure_and_registry_recovers() {
    let config = RegistryConfig::default();
    let id_generator = IdGenerator::with_source(
        config.id_length,
        FailOnceEntropy {
            failed: AtomicBool::new(false),
        },
    );
    let (registry, registry_loop) =
        ClientRegistry::with_id_generator(config, ShutdownCoordinator::new(), id_generator)
            .unwrap();
    tokio::spawn(registry_loop.run());

    let failed = registry.add_client().await;

    assert!(matches!(
        failed.unwrap_err(),
        HubError::RandomnessFailure { .. }
    ));
    assert_eq!(registry.client_count().await, 0);

    let subscriber = registry.add_client().await.unwrap();

    assert_eq!(registry.client_count().await, 1);
    assert!(registry.contains(subscriber.id()).await);
}
