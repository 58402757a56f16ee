use crate::subscriber::{SubscriberActivity, SubscriberSlot};
use crate::{
    HubError, IdGenerator, Metrics, RegistryConfig, Result as HubResult, ShutdownCoordinator,
    ShutdownGuard, Subscriber, SubscriberId,
};

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::{debug, error, info};
use tokio::sync::{RwLock, mpsc, oneshot, watch};

pub(crate) type SubscriberMap = HashMap<SubscriberId, SubscriberSlot>;

/// Structural mutations, applied one at a time by [`RegistryLoop`]
enum Command {
    Add {
        capacity: usize,
        reply: oneshot::Sender<HubResult<Subscriber>>,
    },
    Remove {
        subscriber_id: SubscriberId,
        reply: oneshot::Sender<bool>,
    },
}

/// Registry of connected subscribers.
///
/// Cheap to clone; all clones share one subscriber map. Adds and removes are
/// queued to the single [`RegistryLoop`] that owns membership, while
/// broadcast and targeted sends read the map directly (see `delivery.rs`).
/// The live count is the map's length, so it can never disagree with
/// membership.
pub struct ClientRegistry {
    pub(crate) inner: Arc<RwLock<SubscriberMap>>,
    commands: mpsc::Sender<Command>,
    stopped: watch::Receiver<bool>,
    shutdown: ShutdownCoordinator,
    pub(crate) metrics: Metrics,
    config: RegistryConfig,
}

/// The control loop owning every insert into and removal from the map
pub struct RegistryLoop {
    inner: Arc<RwLock<SubscriberMap>>,
    commands: mpsc::Receiver<Command>,
    stopped: watch::Sender<bool>,
    shutdown: ShutdownGuard,
    id_generator: IdGenerator,
    metrics: Metrics,
}

impl ClientRegistry {
    /// Build a registry and the loop that must be run before any add/remove.
    ///
    /// Fails with `ValidationError` when `config` is out of range.
    pub fn new(
        config: RegistryConfig,
        shutdown: ShutdownCoordinator,
    ) -> HubResult<(Self, RegistryLoop)> {
        let id_generator = IdGenerator::new(config.id_length);
        Self::with_id_generator(config, shutdown, id_generator)
    }

    /// Like [`ClientRegistry::new`], drawing ids from `id_generator`.
    pub fn with_id_generator(
        config: RegistryConfig,
        shutdown: ShutdownCoordinator,
        id_generator: IdGenerator,
    ) -> HubResult<(Self, RegistryLoop)> {
        config.validate()?;

        let inner = Arc::new(RwLock::new(HashMap::new()));
        let (command_tx, command_rx) = mpsc::channel(config.command_queue_capacity);
        let (stopped_tx, stopped_rx) = watch::channel(false);
        let metrics = Metrics::new();

        let registry_loop = RegistryLoop {
            inner: Arc::clone(&inner),
            commands: command_rx,
            stopped: stopped_tx,
            shutdown: shutdown.subscribe_guard(),
            id_generator,
            metrics: metrics.clone(),
        };

        let registry = Self {
            inner,
            commands: command_tx,
            stopped: stopped_rx,
            shutdown,
            metrics,
            config,
        };

        Ok((registry, registry_loop))
    }

    /// Build a registry and spawn its loop on the current tokio runtime
    pub fn spawn(config: RegistryConfig, shutdown: ShutdownCoordinator) -> HubResult<Self> {
        let (registry, registry_loop) = Self::new(config, shutdown)?;
        tokio::spawn(registry_loop.run());
        Ok(registry)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register a subscriber with the default outbox capacity
    pub async fn add_client(&self) -> HubResult<Subscriber> {
        self.add_client_with_capacity(self.config.default_buffer_size)
            .await
    }

    /// Register a subscriber with an outbox holding up to `capacity` payloads.
    ///
    /// Returns once the control loop has inserted it, so a following
    /// [`ClientRegistry::client_count`] already includes it.
    pub async fn add_client_with_capacity(&self, capacity: usize) -> HubResult<Subscriber> {
        if capacity == 0 || capacity > self.config.max_buffer_size {
            return Err(HubError::InvalidCapacity {
                requested: capacity,
                max: self.config.max_buffer_size,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.ensure_open()?;

        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Add { capacity, reply })
            .await
            .map_err(|_| closed_error())?;

        response.await.map_err(|_| closed_error())?
    }

    /// Unregister a subscriber and close its outbox.
    ///
    /// Returns `Ok(false)` for an id that is not registered.
    pub async fn remove_client(&self, subscriber_id: &SubscriberId) -> HubResult<bool> {
        self.ensure_open()?;

        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Remove {
                subscriber_id: subscriber_id.clone(),
                reply,
            })
            .await
            .map_err(|_| closed_error())?;

        response.await.map_err(|_| closed_error())
    }

    /// Get live subscriber count
    pub async fn client_count(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn contains(&self, subscriber_id: &SubscriberId) -> bool {
        self.inner.read().await.contains_key(subscriber_id)
    }

    /// Snapshot of live subscriber ids, sorted
    pub async fn subscriber_ids(&self) -> Vec<SubscriberId> {
        let subscribers = self.inner.read().await;
        let mut ids: Vec<SubscriberId> = subscribers.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.is_shutdown()
    }

    /// Close every outbox and stop the control loop.
    ///
    /// Idempotent. Waits until the loop has closed all outboxes, so the loop
    /// must be running (or already finished) when this is awaited.
    pub async fn shutdown(&self) {
        self.shutdown.shutdown();

        let mut stopped = self.stopped.clone();
        if stopped.wait_for(|done| *done).await.is_err() {
            debug!("Registry loop dropped before reporting shutdown");
        }
    }

    pub(crate) fn ensure_open(&self) -> HubResult<()> {
        if self.shutdown.is_shutdown() {
            return Err(closed_error());
        }
        Ok(())
    }
}

impl Clone for ClientRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            commands: self.commands.clone(),
            stopped: self.stopped.clone(),
            shutdown: self.shutdown.clone(),
            metrics: self.metrics.clone(),
            config: self.config.clone(),
        }
    }
}

impl RegistryLoop {
    /// Process add/remove requests in arrival order until shutdown is
    /// triggered or every registry handle is dropped, then close all
    /// remaining outboxes.
    pub async fn run(mut self) {
        info!("Client registry started");

        loop {
            let command = tokio::select! {
                biased;
                _ = self.shutdown.wait() => None,
                command = self.commands.recv() => command,
            };

            let Some(command) = command else {
                break;
            };

            self.handle(command).await;
        }

        // Queued requests are dropped with their reply channels; callers see Closed.
        self.commands.close();
        self.close_all().await;

        self.stopped.send_replace(true);
    }

    async fn handle(&self, command: Command) {
        match command {
            Command::Add { capacity, reply } => {
                let result = self.register(capacity).await;

                // Requester gave up while we were registering; don't orphan the entry.
                if let Err(Ok(subscriber)) = reply.send(result) {
                    self.unregister(subscriber.id(), "abandoned").await;
                }
            }
            Command::Remove {
                subscriber_id,
                reply,
            } => {
                let removed = self.unregister(&subscriber_id, "removed").await;
                let _ = reply.send(removed);
            }
        }
    }

    async fn register(&self, capacity: usize) -> HubResult<Subscriber> {
        let mut subscribers = self.inner.write().await;

        let subscriber_id = self
            .id_generator
            .generate(|candidate| subscribers.contains_key(candidate))
            .inspect_err(|e| {
                error!("Failed to generate subscriber id: {e}");
                self.metrics.error_occurred(e.error_code());
            })?;

        let (sender, outbox) = mpsc::channel(capacity);
        let activity = Arc::new(SubscriberActivity::now());

        subscribers.insert(
            subscriber_id.clone(),
            SubscriberSlot {
                sender,
                activity: Arc::clone(&activity),
            },
        );

        info!(
            "Registered subscriber {subscriber_id} ({} total)",
            subscribers.len()
        );
        self.metrics.subscriber_added();

        Ok(Subscriber::new(subscriber_id, outbox, activity, capacity))
    }

    async fn unregister(&self, subscriber_id: &SubscriberId, reason: &str) -> bool {
        let mut subscribers = self.inner.write().await;

        // Dropping the slot drops the only sender, closing the outbox.
        if subscribers.remove(subscriber_id).is_some() {
            info!(
                "Unregistered subscriber {subscriber_id} ({reason}, {} total remaining)",
                subscribers.len()
            );
            self.metrics.subscriber_removed(reason);
            true
        } else {
            debug!("Remove requested for unknown subscriber {subscriber_id}");
            false
        }
    }

    async fn close_all(&self) {
        let drained: Vec<(SubscriberId, SubscriberSlot)> = {
            let mut subscribers = self.inner.write().await;
            subscribers.drain().collect()
        };

        let closed = drained.len();
        for (subscriber_id, slot) in drained {
            drop(slot);
            debug!("Closed outbox for subscriber {subscriber_id}");
            self.metrics.subscriber_removed("shutdown");
        }

        info!("Client registry stopped, closed {closed} subscribers");
    }
}

#[track_caller]
fn closed_error() -> HubError {
    HubError::Closed {
        location: ErrorLocation::from(Location::caller()),
    }
}
