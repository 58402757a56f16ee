use sse_hub::{BroadcastReport, SubscriberId};

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BroadcastResponse {
    pub delivered: usize,
    /// Subscribers whose outbox could not take the payload
    pub failed: Vec<SubscriberId>,
}

impl From<BroadcastReport> for BroadcastResponse {
    fn from(report: BroadcastReport) -> Self {
        Self {
            delivered: report.delivered,
            failed: report.failed,
        }
    }
}
