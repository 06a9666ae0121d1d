//! Application Configuration
//!
//! Layered as built-in defaults, then an optional TOML file, then
//! `MILEAGE__*` environment variables (e.g. `MILEAGE__SERVER__BIND_ADDR`).

use std::path::PathBuf;

use ::config::{Config, ConfigError, Environment, File};
use data_validator::ValidationConfig;
use inference_engine::ModelsConfig;
use serde::{Deserialize, Serialize};

use crate::rate_limit::RateLimitConfig;

/// Config file read when `MILEAGE_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "config/mileage.toml";

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Category universe settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoriesConfig {
    /// JSON file of legal values per categorical field
    pub path: Option<PathBuf>,
    /// Reject categorical values missing from the universe
    pub enforce: bool,
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub models: ModelsConfig,
    pub validation: ValidationConfig,
    pub categories: CategoriesConfig,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Load from `MILEAGE_CONFIG` (or the default path) plus environment
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("MILEAGE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load from a specific file (missing file is fine) plus environment
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("MILEAGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load_from("/nonexistent/mileage.toml").unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.validation, ValidationConfig::default());
        assert_eq!(config.models, ModelsConfig::default());
        assert!(config.rate_limit.enabled);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("api-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
[server]
bind_addr = "127.0.0.1:9000"

[validation]
reject_zero_volume = true

[models.city]
model_path = "artifacts/city.json"
schema_path = "artifacts/city_features.json"

[categories]
path = "data/categories.json"
enforce = true
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();
        let config = config.unwrap();

        assert_eq!(config.server.bind_addr, "127.0.0.1:9000");
        assert!(config.validation.reject_zero_volume);
        assert_eq!(config.validation.min_hp, 50.0);
        assert_eq!(
            config.models.city.model_path,
            PathBuf::from("artifacts/city.json")
        );
        assert_eq!(config.models.highway, ModelsConfig::default().highway);
        assert_eq!(
            config.categories.path,
            Some(PathBuf::from("data/categories.json"))
        );
        assert!(config.categories.enforce);
    }
}
