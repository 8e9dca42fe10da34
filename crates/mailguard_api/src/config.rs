//! Configuration management for the email validation API
//!
//! This module handles loading configuration from environment variables
//! and configuration files using the figment crate.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use mailguard_core::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides, e.g. `MAILGUARD_SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "MAILGUARD_";

/// Optional configuration file read from the working directory
pub const CONFIG_FILE: &str = "Config.toml";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub validation: ValidationConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Layer defaults, `Config.toml` (if present) and `MAILGUARD_*` variables
    pub fn load() -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if Path::new(CONFIG_FILE).exists() {
            figment = figment.merge(Toml::file(CONFIG_FILE));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__")).extract()
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable JSON structured logging
    pub json_logs: bool,
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            log_level: "info".to_string(),
        }
    }
}
