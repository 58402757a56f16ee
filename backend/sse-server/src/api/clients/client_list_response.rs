use sse_hub::SubscriberId;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ClientListResponse {
    pub count: usize,
    pub ids: Vec<SubscriberId>,
}
