use config::{Config as ConfigLib, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::utils::error::{NodeError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub node: NodeConfig,
    pub alert: AlertConfig,
    pub location: LocationConfig,
    pub storage: StorageConfig,
    pub realtime: RealtimeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    pub id: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    /// How long a press must be held before it activates, in milliseconds.
    pub hold_threshold_ms: u64,
    /// Radius of the client-side responder lookup, in meters.
    pub responder_radius_m: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    pub acquire_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    pub channel_capacity: usize,
    /// Radius of the dispatcher's own nearby query, in meters. Deliberately
    /// narrower than `alert.responder_radius_m`.
    pub dispatch_radius_m: f64,
    pub metrics_log_interval: u64,
}

impl Config {
    pub fn new() -> Result<Self> {
        let config = ConfigLib::builder()
            // Start with default values
            .set_default("node.id", "beacon-0")?
            .set_default("node.host", "127.0.0.1")?
            .set_default("node.port", 8080)?
            .set_default("node.log_level", "info")?
            .set_default("node.data_dir", "data")?
            .set_default("alert.hold_threshold_ms", 2000)?
            .set_default("alert.responder_radius_m", 5000.0)?
            .set_default("location.acquire_timeout_ms", 10_000)?
            .set_default("storage.path", "data/store")?
            .set_default("realtime.channel_capacity", 256)?
            .set_default("realtime.dispatch_radius_m", 2000.0)?
            .set_default("realtime.metrics_log_interval", 60)?
            // Load from config file
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (e.g., APP_NODE_HOST)
            .add_source(Environment::with_prefix("APP").separator("_"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.node.port == 0 {
            return Err(NodeError::Config("Invalid port number".into()));
        }

        if self.alert.hold_threshold_ms == 0 {
            return Err(NodeError::Config(
                "hold_threshold_ms must be greater than 0".into(),
            ));
        }
        if self.alert.responder_radius_m <= 0.0 {
            return Err(NodeError::Config(
                "responder_radius_m must be greater than 0".into(),
            ));
        }

        if self.location.acquire_timeout_ms == 0 {
            return Err(NodeError::Config(
                "acquire_timeout_ms must be greater than 0".into(),
            ));
        }

        if self.storage.path.is_empty() {
            return Err(NodeError::Config("storage.path must be set".into()));
        }

        if self.realtime.channel_capacity == 0 {
            return Err(NodeError::Config(
                "channel_capacity must be greater than 0".into(),
            ));
        }
        if self.realtime.dispatch_radius_m <= 0.0 {
            return Err(NodeError::Config(
                "dispatch_radius_m must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    pub fn hold_threshold(&self) -> Duration {
        Duration::from_millis(self.alert.hold_threshold_ms)
    }

    pub fn location_timeout(&self) -> Duration {
        Duration::from_millis(self.location.acquire_timeout_ms)
    }

    pub fn metrics_log_interval(&self) -> Duration {
        Duration::from_secs(self.realtime.metrics_log_interval)
    }
}

impl From<ConfigError> for NodeError {
    fn from(error: ConfigError) -> Self {
        NodeError::Config(error.to_string())
    }
}
