use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
}

impl Config {
    /// Loads from an optional `config.toml` with `HYBRID_*` environment
    /// overrides on top of built-in defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("database.path", "hybrid_system.db")?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("HYBRID").separator("_"))
            .build()?;

        settings.try_deserialize()
    }
}
