use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_BUFFER_SIZE, DEFAULT_COMMAND_QUEUE_CAPACITY,
    DEFAULT_ID_LENGTH, DEFAULT_MAX_BUFFER_SIZE, MAX_COMMAND_QUEUE_CAPACITY,
    MAX_DEFAULT_BUFFER_SIZE, MAX_ID_LENGTH, MIN_BUFFER_SIZE, MIN_COMMAND_QUEUE_CAPACITY,
    MIN_ID_LENGTH,
};

use serde::Deserialize;

/// Subscriber registry tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Outbox capacity when a subscriber does not ask for one
    pub default_buffer_size: usize,
    /// Largest outbox a subscriber may request
    pub max_buffer_size: usize,
    /// Characters per generated subscriber id
    pub id_length: usize,
    /// Pending add/remove requests before callers wait
    pub command_queue_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            default_buffer_size: DEFAULT_BUFFER_SIZE,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
            id_length: DEFAULT_ID_LENGTH,
            command_queue_capacity: DEFAULT_COMMAND_QUEUE_CAPACITY,
        }
    }
}

impl HubConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !(MIN_BUFFER_SIZE..=MAX_DEFAULT_BUFFER_SIZE).contains(&self.default_buffer_size) {
            return Err(ConfigError::hub(format!(
                "hub.default_buffer_size must be {}-{}, got {}",
                MIN_BUFFER_SIZE, MAX_DEFAULT_BUFFER_SIZE, self.default_buffer_size
            )));
        }

        if self.max_buffer_size < self.default_buffer_size {
            return Err(ConfigError::hub(format!(
                "hub.max_buffer_size ({}) must be >= hub.default_buffer_size ({})",
                self.max_buffer_size, self.default_buffer_size
            )));
        }

        if !(MIN_ID_LENGTH..=MAX_ID_LENGTH).contains(&self.id_length) {
            return Err(ConfigError::hub(format!(
                "hub.id_length must be {}-{}, got {}",
                MIN_ID_LENGTH, MAX_ID_LENGTH, self.id_length
            )));
        }

        if !(MIN_COMMAND_QUEUE_CAPACITY..=MAX_COMMAND_QUEUE_CAPACITY)
            .contains(&self.command_queue_capacity)
        {
            return Err(ConfigError::hub(format!(
                "hub.command_queue_capacity must be {}-{}, got {}",
                MIN_COMMAND_QUEUE_CAPACITY, MAX_COMMAND_QUEUE_CAPACITY, self.command_queue_capacity
            )));
        }

        Ok(())
    }
}
