use crate::{HubError, Result as HubResult, SubscriberId};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::Serialize;

/// Outcome of one broadcast across every live subscriber
#[derive(Debug, Clone, Default, Serialize)]
pub struct BroadcastReport {
    /// Subscribers whose outbox accepted the payload
    pub delivered: usize,
    /// Subscribers that were skipped because their outbox was full or gone
    pub failed: Vec<SubscriberId>,
}

impl BroadcastReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Collapse to a single result: the delivered count, or `NotReady` for the
    /// last subscriber that could not take the payload.
    #[track_caller]
    pub fn into_result(self) -> HubResult<usize> {
        match self.failed.last() {
            Some(subscriber_id) => Err(HubError::NotReady {
                subscriber_id: subscriber_id.clone(),
                location: ErrorLocation::from(Location::caller()),
            }),
            None => Ok(self.delivered),
        }
    }
}
