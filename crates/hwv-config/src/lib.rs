//! # hwv-config
//!
//! Layered configuration loading for the hardware survey service using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`HWV_*` prefix, `__` as separator)
//! 2. Project-level `.hwv/config.toml`
//! 3. User-level `~/.config/hwv/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `HWV_SERVER__BIND` -> `server.bind`,
//! `HWV_RECALC__POLICY` -> `recalc.policy`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use hwv_config::HwvConfig;
//!
//! let config = HwvConfig::load_with_dotenv().expect("config");
//! println!("listening on {}", config.server.bind);
//! ```

mod client;
mod database;
mod error;
mod recalc;
mod schema;
mod server;

pub use client::ClientConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use recalc::RecalcConfig;
pub use schema::SchemaConfig;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local directory holding config and the default database.
pub const PROJECT_DIR: &str = ".hwv";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HwvConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub schema: SchemaConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub recalc: RecalcConfig,
}

impl HwvConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed, or
    /// `ConfigError::InvalidValue` if the merged values fail [`Self::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("HWV_").split("__"))
    }

    /// Reject values that would only fail later at first use.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.recalc.device_key_pointer.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "recalc.device_key_pointer".into(),
                reason: format!(
                    "'{}' is not a JSON pointer (must start with '/')",
                    self.recalc.device_key_pointer
                ),
            });
        }
        if self.client.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "client.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.server.bind.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "server.bind".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hwv").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwv_core::enums::RecalcPolicy;

    #[test]
    fn default_config_is_valid() {
        let config = HwvConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind, "127.0.0.1:5080");
        assert_eq!(config.database.path, ".hwv/survey.db");
        assert!(!config.schema.has_file());
        assert_eq!(config.client.timeout_secs, 10);
        assert_eq!(config.recalc.policy, RecalcPolicy::Queue);
        assert!(!config.recalc.is_scheduled());
        assert_eq!(config.recalc.device_key_pointer, "/deviceId");
    }

    #[test]
    fn validate_rejects_bad_pointer() {
        let mut config = HwvConfig::default();
        config.recalc.device_key_pointer = "deviceId".into();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "recalc.device_key_pointer"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = HwvConfig::default();
        config.client.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn in_memory_database_detected() {
        let mut config = HwvConfig::default();
        assert!(!config.database.is_in_memory());
        config.database.path = ":memory:".into();
        assert!(config.database.is_in_memory());
    }
}
