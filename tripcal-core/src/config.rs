//! Service configuration.
//!
//! Layered from defaults, then `~/.config/tripcal/config.toml`, then
//! `TRIPCAL_*` environment variables.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{TripCalError, TripCalResult};
use crate::feed::{DEFAULT_TIMEOUT_SECS, RequestTimeout};
use crate::sync::DEFAULT_MAX_ATTEMPTS;

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_table_api_url() -> String {
    "http://127.0.0.1:8000/api/tables".to_string()
}

fn default_trips_table() -> String {
    "trips".to_string()
}

fn default_events_table() -> String {
    "events".to_string()
}

fn default_max_sync_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_timeout() -> i64 {
    DEFAULT_TIMEOUT_SECS as i64
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the remote table API
    #[serde(default = "default_table_api_url")]
    pub table_api_url: String,

    #[serde(default = "default_trips_table")]
    pub trips_table: String,

    #[serde(default = "default_events_table")]
    pub events_table: String,

    #[serde(default = "default_max_sync_attempts")]
    pub max_sync_attempts: u32,

    /// Seconds, used when a request does not pass `timeout`
    #[serde(default = "default_timeout")]
    pub default_timeout: i64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            host: default_host(),
            port: default_port(),
            table_api_url: default_table_api_url(),
            trips_table: default_trips_table(),
            events_table: default_events_table(),
            max_sync_attempts: default_max_sync_attempts(),
            default_timeout: default_timeout(),
        }
    }
}

impl ServiceConfig {
    pub fn config_path() -> TripCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TripCalError::Config("Could not determine config directory".into()))?
            .join("tripcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default config file (if any) and the environment.
    pub fn load() -> TripCalResult<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> TripCalResult<Self> {
        let config: ServiceConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("TRIPCAL").try_parsing(true))
            .build()
            .map_err(|e| TripCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| TripCalError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> TripCalResult<()> {
        RequestTimeout::new(self.default_timeout)
            .map_err(|e| TripCalError::Config(format!("default_timeout: {e}")))?;
        if self.max_sync_attempts == 0 {
            return Err(TripCalError::Config(
                "max_sync_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn default_request_timeout(&self) -> RequestTimeout {
        RequestTimeout::new(self.default_timeout).unwrap_or_default()
    }
}
