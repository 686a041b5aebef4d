use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub timeout_ms: u64,
}

impl SerialConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub serial: SerialConfig,
    pub database: DatabaseConfig,
}

impl Config {
    /// Loads from an optional `config.toml` with `HYBRID_*` environment
    /// overrides on top of built-in defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("serial.baud_rate", 115_200_i64)?
            .set_default("serial.timeout_ms", 1000_i64)?
            .set_default("database.path", "hybrid_system.db")?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("HYBRID").separator("_"))
            .build()?;

        settings.try_deserialize()
    }
}
