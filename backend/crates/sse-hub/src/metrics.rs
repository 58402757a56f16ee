use metrics::{counter, gauge};

/// Metrics collector for registry and delivery operations
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "sse_hub" }
    }

    /// Record subscriber registered
    pub fn subscriber_added(&self) {
        counter!(format!("{}.subscribers.added", self.prefix)).increment(1);
        gauge!(format!("{}.subscribers.active", self.prefix)).increment(1.0);
    }

    /// Record subscriber unregistered; `reason` is "removed" or "shutdown"
    pub fn subscriber_removed(&self, reason: &str) {
        counter!(format!("{}.subscribers.removed", self.prefix)).increment(1);
        counter!(format!("{}.subscribers.removed.{}", self.prefix, reason)).increment(1);
        gauge!(format!("{}.subscribers.active", self.prefix)).decrement(1.0);
    }

    /// Record payload enqueued onto an outbox
    pub fn message_delivered(&self) {
        counter!(format!("{}.messages.delivered", self.prefix)).increment(1);
    }

    /// Record payload dropped because the outbox was full or gone
    pub fn message_dropped(&self) {
        counter!(format!("{}.messages.dropped", self.prefix)).increment(1);
    }

    /// Record broadcast fan-out
    pub fn broadcast_published(&self, delivered: usize, failed: usize) {
        counter!(format!("{}.broadcast.published", self.prefix)).increment(1);
        gauge!(format!("{}.broadcast.last_delivered", self.prefix)).set(delivered as f64);
        gauge!(format!("{}.broadcast.last_failed", self.prefix)).set(failed as f64);
    }

    /// Record error occurrence by code
    pub fn error_occurred(&self, error_code: &str) {
        counter!(format!("{}.errors.total", self.prefix)).increment(1);
        counter!(format!("{}.errors.{}", self.prefix, error_code)).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
