//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator, RedisConfig};
use config::{Config, ConfigError, Environment, File};
use orderly_core::OrderlyError;
use std::path::Path;
use tracing::{debug, info};

/// Values of the legacy, unprefixed environment variables.
///
/// These predate the `ORDERLY__*` scheme and are still honored so existing
/// deployments keep working.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyEnv {
    pub db_host: Option<String>,
    pub db_user: Option<String>,
    pub db_pass: Option<String>,
    pub db_name: Option<String>,
    pub redis_host: Option<String>,
    pub redis_port: Option<String>,
    pub app_env: Option<String>,
}

impl LegacyEnv {
    /// Reads the legacy variables from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        Self {
            db_host: var("DB_HOST"),
            db_user: var("DB_USER"),
            db_pass: var("DB_PASS"),
            db_name: var("DB_NAME"),
            redis_host: var("REDIS_HOST"),
            redis_port: var("REDIS_PORT"),
            app_env: var("APP_ENV"),
        }
    }

    fn redis_url(&self) -> Option<String> {
        self.redis_host
            .as_deref()
            .map(|host| RedisConfig::url_from_host_port(host, self.redis_port.as_deref()))
    }
}

/// Layered configuration loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local, uncommitted overrides
    /// 4. Environment variables with `ORDERLY__` prefix
    /// 5. Legacy `DB_*`, `REDIS_*` and `APP_ENV` variables
    pub fn new(config_dir: impl Into<String>) -> Result<Self, OrderlyError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        Self::with_legacy_env(config_dir, &LegacyEnv::from_env())
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, OrderlyError> {
        Self::new("./config")
    }

    /// Loads configuration with explicitly supplied legacy variables.
    pub fn with_legacy_env(
        config_dir: impl Into<String>,
        legacy: &LegacyEnv,
    ) -> Result<Self, OrderlyError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir, legacy)?;
        Ok(Self { config, config_dir })
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub const fn get(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the directory the configuration was read from.
    #[must_use]
    pub fn config_dir(&self) -> &str {
        &self.config_dir
    }

    /// Consumes the loader and returns the configuration.
    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    fn load_config(config_dir: &str, legacy: &LegacyEnv) -> Result<AppConfig, OrderlyError> {
        let environment = std::env::var("ORDERLY_ENVIRONMENT")
            .ok()
            .or_else(|| legacy.app_env.clone())
            .unwrap_or_else(|| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("ORDERLY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder = builder
            .set_override("app.environment", environment.clone())
            .and_then(|b| b.set_override_option("database.host", legacy.db_host.clone()))
            .and_then(|b| b.set_override_option("database.user", legacy.db_user.clone()))
            .and_then(|b| b.set_override_option("database.password", legacy.db_pass.clone()))
            .and_then(|b| b.set_override_option("database.name", legacy.db_name.clone()))
            .and_then(|b| b.set_override_option("redis.url", legacy.redis_url()))
            .map_err(config_error_to_orderly_error)?;

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error_to_orderly_error)?;

        ConfigValidator::validate(&app_config)
            .map_err(|errors| OrderlyError::Configuration(format_validation_errors(&errors)))?;

        Ok(app_config)
    }
}

fn config_error_to_orderly_error(err: ConfigError) -> OrderlyError {
    OrderlyError::Configuration(err.to_string())
}
