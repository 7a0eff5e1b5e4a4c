use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // NATS configuration
    /// NATS server URL
    #[serde(default = "default_nats_url")]
    pub nats_url: String,

    /// Timeout for establishing the NATS connection in seconds
    #[serde(default = "default_nats_connect_timeout_secs")]
    pub nats_connect_timeout_secs: u64,

    /// JetStream stream name for republished weather observations
    #[serde(default = "default_weather_stream")]
    pub weather_stream: String,

    /// JetStream stream name for soil moisture readings
    #[serde(default = "default_soil_moisture_stream")]
    pub soil_moisture_stream: String,

    // Consumer configuration
    /// Durable consumer name for the observation logger
    #[serde(default = "default_consumer_name")]
    pub consumer_name: String,

    /// Whether to run the observation consumer loop
    #[serde(default = "default_consumer_enabled")]
    pub consumer_enabled: bool,

    /// Batch size for consumer polls
    #[serde(default = "default_consumer_batch_size")]
    pub consumer_batch_size: usize,

    /// Max wait time for a consumer poll in seconds
    #[serde(default = "default_consumer_max_wait_secs")]
    pub consumer_max_wait_secs: u64,

    // Publish path configuration
    /// Envelopes buffered between request handlers and the publish worker
    #[serde(default = "default_publish_queue_capacity")]
    pub publish_queue_capacity: usize,

    /// Publish attempts per envelope before it is dropped
    #[serde(default = "default_publish_max_attempts")]
    pub publish_max_attempts: u32,

    /// Pause between publish attempts in milliseconds
    #[serde(default = "default_publish_retry_backoff_ms")]
    pub publish_retry_backoff_ms: u64,

    /// Grace period for flushing the publish queue on shutdown in seconds
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,

    // gRPC configuration
    /// gRPC server host
    #[serde(default = "default_grpc_host")]
    pub grpc_host: String,

    /// gRPC server port
    #[serde(default = "default_grpc_port")]
    pub grpc_port: u16,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_nats_url() -> String {
    "nats://localhost:4222".to_string()
}

fn default_nats_connect_timeout_secs() -> u64 {
    10
}

fn default_weather_stream() -> String {
    "weather_observations".to_string()
}

fn default_soil_moisture_stream() -> String {
    "soil_moisture".to_string()
}

fn default_consumer_name() -> String {
    "weather-observation-logger".to_string()
}

fn default_consumer_enabled() -> bool {
    true
}

fn default_consumer_batch_size() -> usize {
    10
}

fn default_consumer_max_wait_secs() -> u64 {
    5
}

fn default_publish_queue_capacity() -> usize {
    1024
}

fn default_publish_max_attempts() -> u32 {
    3
}

fn default_publish_retry_backoff_ms() -> u64 {
    250
}

fn default_shutdown_grace_secs() -> u64 {
    5
}

fn default_grpc_host() -> String {
    "0.0.0.0".to_string()
}

fn default_grpc_port() -> u16 {
    50052
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_with_no_sources() {
        let config: ServiceConfig = Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.weather_stream, "weather_observations");
        assert_eq!(config.soil_moisture_stream, "soil_moisture");
        assert_eq!(config.grpc_port, 50052);
        assert_eq!(config.publish_max_attempts, 3);
        assert!(config.consumer_enabled);
    }
}
