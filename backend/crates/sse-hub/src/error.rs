use crate::SubscriberId;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("Subscriber {subscriber_id} not found {location}")]
    NotFound {
        subscriber_id: SubscriberId,
        location: ErrorLocation,
    },

    #[error("Subscriber {subscriber_id} is not ready to receive messages {location}")]
    NotReady {
        subscriber_id: SubscriberId,
        location: ErrorLocation,
    },

    #[error("Registry is shut down {location}")]
    Closed { location: ErrorLocation },

    #[error("Streaming unsupported: {message} {location}")]
    TransportUnsupported {
        message: String,
        location: ErrorLocation,
    },

    #[error("Entropy source failed: {message} {location}")]
    RandomnessFailure {
        message: String,
        location: ErrorLocation,
    },

    #[error("No free subscriber id after {attempts} attempts {location}")]
    IdCollision {
        attempts: usize,
        location: ErrorLocation,
    },

    #[error("Invalid outbox capacity {requested} (allowed 1-{max}) {location}")]
    InvalidCapacity {
        requested: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Validation failed: {message}")]
    ValidationError {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },
}

impl HubError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::NotReady { .. } => "SLOW_CLIENT",
            Self::Closed { .. } => "REGISTRY_CLOSED",
            Self::TransportUnsupported { .. } => "STREAMING_UNSUPPORTED",
            Self::RandomnessFailure { .. } => "RANDOMNESS_FAILURE",
            Self::IdCollision { .. } => "ID_COLLISION",
            Self::InvalidCapacity { .. } => "INVALID_CAPACITY",
            Self::ValidationError { .. } => "VALIDATION_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, HubError>;
