use crate::SubscriberId;

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Connection timestamps shared between the registry and the subscriber handle
#[derive(Debug)]
pub(crate) struct SubscriberActivity {
    connected_at: DateTime<Utc>,
    /// Microseconds since the Unix epoch
    last_active_micros: AtomicI64,
}

impl SubscriberActivity {
    pub(crate) fn now() -> Self {
        let now = Utc::now();
        Self {
            connected_at: now,
            last_active_micros: AtomicI64::new(now.timestamp_micros()),
        }
    }

    pub(crate) fn touch(&self) {
        self.last_active_micros
            .store(Utc::now().timestamp_micros(), Ordering::Relaxed);
    }

    fn last_active_at(&self) -> DateTime<Utc> {
        let micros = self.last_active_micros.load(Ordering::Relaxed);
        DateTime::from_timestamp_micros(micros).unwrap_or(self.connected_at)
    }
}

/// Registry-side half of a subscriber: the only sender for its outbox.
///
/// Dropping the slot closes the outbox, so the registry closes each outbox
/// exactly once by removing the slot from its map.
pub(crate) struct SubscriberSlot {
    pub(crate) sender: mpsc::Sender<Bytes>,
    pub(crate) activity: Arc<SubscriberActivity>,
}

/// A registered recipient of push messages.
///
/// Returned by [`crate::ClientRegistry::add_client`]. The holder drains the
/// outbox; the registry owns membership and closes the outbox on removal or
/// shutdown, after which [`Subscriber::recv`] yields `None`.
#[derive(Debug)]
pub struct Subscriber {
    id: SubscriberId,
    outbox: mpsc::Receiver<Bytes>,
    activity: Arc<SubscriberActivity>,
    capacity: usize,
}

impl Subscriber {
    pub(crate) fn new(
        id: SubscriberId,
        outbox: mpsc::Receiver<Bytes>,
        activity: Arc<SubscriberActivity>,
        capacity: usize,
    ) -> Self {
        Self {
            id,
            outbox,
            activity,
            capacity,
        }
    }

    pub fn id(&self) -> &SubscriberId {
        &self.id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.activity.connected_at
    }

    /// Time of the last successful enqueue (equals `connected_at` until then)
    pub fn last_active_at(&self) -> DateTime<Utc> {
        self.activity.last_active_at()
    }

    /// Wait for the next payload; `None` once the outbox is closed and drained
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.outbox.recv().await
    }

    /// Take a pending payload without waiting
    pub fn try_recv(&mut self) -> Result<Bytes, mpsc::error::TryRecvError> {
        self.outbox.try_recv()
    }

    /// True once the registry has closed this outbox
    pub fn is_closed(&self) -> bool {
        self.outbox.is_closed()
    }

    /// Number of payloads waiting in the outbox
    pub fn pending(&self) -> usize {
        self.outbox.len()
    }
}
