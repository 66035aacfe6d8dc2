//! # Unified Application Configuration
//!
//! This module provides a centralized configuration system that consolidates
//! all application settings into a single, structured configuration object.
//! It supports loading from environment variables, validation, and provides
//! a clean interface for accessing configuration throughout the application.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Local nutrition dataset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Explicit dataset path; fallback paths are tried when unset
    pub path: Option<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self { path: None }
    }
}

impl DatasetConfig {
    /// Validate dataset configuration
    pub fn validate(&self) -> AppResult<()> {
        if let Some(path) = &self.path {
            if path.trim().is_empty() {
                return Err(AppError::Config(
                    "NUTRITION_DB_PATH cannot be empty if set".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Food resolver and external-tier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Enable the Canadian Nutrient File fallback tier
    pub enable_cnf: bool,
    /// Enable the USDA FoodData Central fallback tier
    pub enable_usda: bool,
    /// USDA API key; DEMO_KEY works for light use
    pub usda_api_key: String,
    /// Per-request timeout for external tier HTTP calls in seconds
    pub http_timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            enable_cnf: false,
            enable_usda: false,
            usda_api_key: "DEMO_KEY".to_string(),
            http_timeout_secs: 10,
        }
    }
}

impl ResolverConfig {
    /// Validate resolver configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.http_timeout_secs == 0 {
            return Err(AppError::Config("HTTP timeout cannot be 0".to_string()));
        }

        if self.http_timeout_secs > 300 {
            return Err(AppError::Config(
                "HTTP timeout cannot be greater than 300 seconds".to_string(),
            ));
        }

        if self.enable_usda && self.usda_api_key.trim().is_empty() {
            return Err(AppError::Config(
                "USDA_API_KEY cannot be empty when the USDA tier is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

/// Webhook server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port the webhook server listens on
    pub port: u16,
    /// Bind on all interfaces instead of localhost only
    pub bind_all: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_all: false,
        }
    }
}

impl HttpConfig {
    /// Validate webhook server configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.port < 1024
            && env::var("ALLOW_PRIVILEGED_PORTS").unwrap_or_else(|_| "false".to_string()) != "true"
        {
            return Err(AppError::Config(format!(
                "WEBHOOK_PORT {} is a privileged port (< 1024). Set ALLOW_PRIVILEGED_PORTS=true to allow or use a port >= 1024",
                self.port
            )));
        }
        Ok(())
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub resolver: ResolverConfig,
    pub http: HttpConfig,
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> AppResult<Self> {
        let dataset = DatasetConfig {
            path: env::var("NUTRITION_DB_PATH").ok(),
        };

        let resolver = ResolverConfig {
            enable_cnf: env_flag("ENABLE_CNF_API"),
            enable_usda: env_flag("ENABLE_USDA_API"),
            usda_api_key: env::var("USDA_API_KEY").unwrap_or_else(|_| "DEMO_KEY".to_string()),
            http_timeout_secs: env_u64("HTTP_CLIENT_TIMEOUT_SECS", 10)?,
        };

        let http = HttpConfig {
            port: env_u16("WEBHOOK_PORT", 8080)?,
            bind_all: env_flag("WEBHOOK_BIND_ALL_INTERFACES"),
        };

        Ok(Self {
            dataset,
            resolver,
            http,
        })
    }

    /// Validate every configuration section
    pub fn validate(&self) -> AppResult<()> {
        self.dataset.validate()?;
        self.resolver.validate()?;
        self.http.validate()?;
        Ok(())
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|value| value.to_lowercase() == "true")
        .unwrap_or(false)
}

fn env_u64(key: &str, default: u64) -> AppResult<u64> {
    match env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map_err(|_| AppError::Config(format!("{} must be a valid number", key))),
        Err(_) => Ok(default),
    }
}

fn env_u16(key: &str, default: u16) -> AppResult<u16> {
    match env::var(key) {
        Ok(value) => value
            .parse::<u16>()
            .map_err(|_| AppError::Config(format!("{} must be a valid port number (1-65535)", key))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = ResolverConfig {
            http_timeout_secs: 0,
            ..ResolverConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn usda_tier_requires_api_key() {
        let config = ResolverConfig {
            enable_usda: true,
            usda_api_key: "  ".to_string(),
            ..ResolverConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
