mod config;
mod error;
mod hub_config;
mod log_level;
mod logging_config;
mod server_config;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use hub_config::HubConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use server_config::ServerConfig;

#[cfg(test)]
mod tests;

const CONFIG_DIR_ENV: &str = "SSE_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".sse";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const MIN_PORT: u16 = 1024;

const DEFAULT_BUFFER_SIZE: usize = 10;
const MIN_BUFFER_SIZE: usize = 1;
const MAX_DEFAULT_BUFFER_SIZE: usize = 10_000;
const DEFAULT_MAX_BUFFER_SIZE: usize = 1000;

const DEFAULT_ID_LENGTH: usize = 20;
const MIN_ID_LENGTH: usize = 8;
const MAX_ID_LENGTH: usize = 64;

const DEFAULT_COMMAND_QUEUE_CAPACITY: usize = 256;
const MIN_COMMAND_QUEUE_CAPACITY: usize = 1;
const MAX_COMMAND_QUEUE_CAPACITY: usize = 65_536;

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
