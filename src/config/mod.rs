pub mod database;

use serde::Deserialize;
use std::time::Duration;

use crate::services::availability::WindowPolicy;

pub const ENV_PREFIX: &str = "WALT";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Without a database the service runs against the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub availability_window_minutes: u64,
    pub window_policy: WindowPolicy,
    pub serialize_per_city: bool,
    pub log_json: bool,
}

/// The part of [`Config`] the assignment service reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    pub availability_window: Duration,
    pub window_policy: WindowPolicy,
    pub serialize_per_city: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            availability_window: Duration::from_secs(60 * 60),
            window_policy: WindowPolicy::default(),
            serialize_per_city: false,
        }
    }
}

impl Config {
    /// Reads `WALT_*` environment variables over built-in defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    fn from_source<S>(source: S) -> anyhow::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .set_default("port", 8080)?
            .set_default("db_max_connections", 10)?
            .set_default("availability_window_minutes", 60)?
            .set_default("window_policy", "symmetric")?
            .set_default("serialize_per_city", false)?
            .set_default("log_json", false)?
            .add_source(source)
            .build()?
            .try_deserialize::<Config>()
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

        if config.availability_window_minutes == 0 {
            anyhow::bail!("availability_window_minutes must be positive");
        }
        if config.availability_window_minutes.checked_mul(60).is_none() {
            anyhow::bail!(
                "availability_window_minutes is too large: {}",
                config.availability_window_minutes
            );
        }

        Ok(config)
    }

    pub fn service(&self) -> ServiceConfig {
        ServiceConfig {
            availability_window: Duration::from_secs(
                self.availability_window_minutes.saturating_mul(60),
            ),
            window_policy: self.window_policy,
            serialize_per_city: self.serialize_per_city,
        }
    }
}
