use crate::{HubError, Result as HubResult};

use std::ops::RangeInclusive;
use std::panic::Location;

use error_location::ErrorLocation;

const DEFAULT_BUFFER_RANGE: RangeInclusive<usize> = 1..=10_000;
const ID_LENGTH_RANGE: RangeInclusive<usize> = 8..=64;
const COMMAND_QUEUE_RANGE: RangeInclusive<usize> = 1..=65_536;

/// Configuration for the client registry
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Outbox capacity used when a subscriber does not ask for one
    pub default_buffer_size: usize,
    /// Largest outbox capacity a subscriber may request
    pub max_buffer_size: usize,
    /// Length of generated subscriber ids
    pub id_length: usize,
    /// Pending add/remove requests before producers wait
    pub command_queue_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_buffer_size: 10,
            max_buffer_size: 1000,
            id_length: 20,
            command_queue_capacity: 256,
        }
    }
}

impl RegistryConfig {
    /// Check every field before a registry is built from it.
    #[track_caller]
    pub fn validate(&self) -> HubResult<()> {
        if !DEFAULT_BUFFER_RANGE.contains(&self.default_buffer_size) {
            return Err(invalid(
                "default_buffer_size",
                format!(
                    "default_buffer_size must be {}-{}, got {}",
                    DEFAULT_BUFFER_RANGE.start(),
                    DEFAULT_BUFFER_RANGE.end(),
                    self.default_buffer_size
                ),
            ));
        }

        if self.max_buffer_size < self.default_buffer_size {
            return Err(invalid(
                "max_buffer_size",
                format!(
                    "max_buffer_size ({}) must be >= default_buffer_size ({})",
                    self.max_buffer_size, self.default_buffer_size
                ),
            ));
        }

        if !ID_LENGTH_RANGE.contains(&self.id_length) {
            return Err(invalid(
                "id_length",
                format!(
                    "id_length must be {}-{}, got {}",
                    ID_LENGTH_RANGE.start(),
                    ID_LENGTH_RANGE.end(),
                    self.id_length
                ),
            ));
        }

        if !COMMAND_QUEUE_RANGE.contains(&self.command_queue_capacity) {
            return Err(invalid(
                "command_queue_capacity",
                format!(
                    "command_queue_capacity must be {}-{}, got {}",
                    COMMAND_QUEUE_RANGE.start(),
                    COMMAND_QUEUE_RANGE.end(),
                    self.command_queue_capacity
                ),
            ));
        }

        Ok(())
    }
}

#[track_caller]
fn invalid(field: &str, message: String) -> HubError {
    HubError::ValidationError {
        message,
        field: Some(field.to_string()),
        location: ErrorLocation::from(Location::caller()),
    }
}
