//! Broadcast and targeted delivery.
//!
//! Delivery never waits on a subscriber: each enqueue is a `try_send`, and a
//! full outbox drops the payload for that subscriber only. Both operations
//! take the map's read lock, so they run alongside each other and only
//! serialize against the control loop's brief inserts and removals.

use crate::subscriber::SubscriberSlot;
use crate::{BroadcastReport, ClientRegistry, HubError, Result as HubResult, SubscriberId};

use std::panic::Location;

use bytes::Bytes;
use error_location::ErrorLocation;
use log::{debug, warn};
use tokio::sync::mpsc::error::TrySendError;

impl ClientRegistry {
    /// Offer `payload` to every live subscriber and report who missed it
    pub async fn broadcast_report(&self, payload: impl Into<Bytes>) -> HubResult<BroadcastReport> {
        self.ensure_open()?;

        let payload = payload.into();
        let mut report = BroadcastReport::default();

        {
            let subscribers = self.inner.read().await;
            for (subscriber_id, slot) in subscribers.iter() {
                match self.enqueue(subscriber_id, slot, payload.clone()) {
                    Ok(()) => report.delivered += 1,
                    Err(_) => report.failed.push(subscriber_id.clone()),
                }
            }
        }

        debug!(
            "Broadcast {} bytes to {} subscribers ({} failed)",
            payload.len(),
            report.delivered,
            report.failed.len()
        );
        self.metrics
            .broadcast_published(report.delivered, report.failed.len());

        Ok(report)
    }

    /// Offer `payload` to every live subscriber.
    ///
    /// Returns the delivered count, or `NotReady` naming the last subscriber
    /// that could not take it. Use [`ClientRegistry::broadcast_report`] to see
    /// every failure.
    pub async fn broadcast_message(&self, payload: impl Into<Bytes>) -> HubResult<usize> {
        self.broadcast_report(payload).await?.into_result()
    }

    /// Offer `payload` to one subscriber
    pub async fn send_message_to_client(
        &self,
        subscriber_id: &SubscriberId,
        payload: impl Into<Bytes>,
    ) -> HubResult<()> {
        self.ensure_open()?;

        let subscribers = self.inner.read().await;
        let slot = subscribers
            .get(subscriber_id)
            .ok_or_else(|| HubError::NotFound {
                subscriber_id: subscriber_id.clone(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.enqueue(subscriber_id, slot, payload.into())
    }

    fn enqueue(
        &self,
        subscriber_id: &SubscriberId,
        slot: &SubscriberSlot,
        payload: Bytes,
    ) -> HubResult<()> {
        match slot.sender.try_send(payload) {
            Ok(()) => {
                slot.activity.touch();
                self.metrics.message_delivered();
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                warn!("Outbox full for subscriber {subscriber_id}, message dropped");
                self.metrics.message_dropped();
                Err(not_ready(subscriber_id))
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Outbox reader for subscriber {subscriber_id} is gone, message dropped");
                self.metrics.message_dropped();
                Err(not_ready(subscriber_id))
            }
        }
    }
}

#[track_caller]
fn not_ready(subscriber_id: &SubscriberId) -> HubError {
    HubError::NotReady {
        subscriber_id: subscriber_id.clone(),
        location: ErrorLocation::from(Location::caller()),
    }
}
