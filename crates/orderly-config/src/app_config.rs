//! Application configuration structures.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Redis and local cache configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "orderly".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

impl AppMetadata {
    /// Whether the app runs in the development environment.
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// REST server host.
    pub host: String,
    /// REST server port.
    pub port: u16,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    /// Enable CORS.
    pub cors_enabled: bool,
    /// Enable gzip response compression.
    pub compression_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout_secs: 30,
            max_body_size: 1024 * 1024, // 1MB
            cors_enabled: true,
            compression_enabled: true,
        }
    }
}

impl ServerConfig {
    /// Returns the REST server address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Database configuration.
///
/// Either the individual connection parts or a full `url` override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database user.
    pub user: String,
    /// Database password.
    pub password: String,
    /// Database name.
    pub name: String,
    /// Full connection URL; takes precedence over the parts above.
    pub url: Option<String>,
    /// Minimum connection pool size.
    pub min_connections: u32,
    /// Maximum connection pool size.
    pub max_connections: u32,
    /// Connection acquire timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds.
    pub idle_timeout_secs: u64,
    /// Run migrations on startup.
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "orderly".to_string(),
            url: None,
            min_connections: 1,
            max_connections: 10,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
            run_migrations: true,
        }
    }
}

impl DatabaseConfig {
    /// Returns the PostgreSQL connection URL.
    ///
    /// Credentials are percent-encoded when built from parts.
    #[must_use]
    pub fn connection_url(&self) -> String {
        if let Some(url) = self.url.as_ref().filter(|u| !u.is_empty()) {
            return url.clone();
        }

        match self.build_url() {
            Some(url) => url.to_string(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }

    fn build_url(&self) -> Option<Url> {
        let mut url = Url::parse(&format!("postgres://{}:{}", self.host, self.port)).ok()?;
        url.set_username(&self.user).ok()?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password)).ok()?;
        }
        url.set_path(&self.name);
        Some(url)
    }

    /// Returns the connect timeout as a Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the idle timeout as a Duration.
    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

/// Redis and local cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis URL.
    pub url: String,
    /// Connection pool size.
    pub pool_size: u32,
    /// Enable the remote tier (disabled means always-miss).
    pub enabled: bool,
    /// Remote entry TTL in seconds.
    pub ttl_secs: u64,
    /// Maximum number of entries in the local tier.
    pub local_capacity: u64,
    /// Local entry TTL in seconds.
    pub local_ttl_secs: u64,
    /// Flush the cache on startup in development.
    pub flush_on_startup: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            pool_size: 10,
            enabled: true,
            ttl_secs: 300,
            local_capacity: 1000,
            local_ttl_secs: 60,
            flush_on_startup: true,
        }
    }
}

impl RedisConfig {
    /// Builds a Redis URL from the legacy host/port pair.
    #[must_use]
    pub fn url_from_host_port(host: &str, port: Option<&str>) -> String {
        let port = port.filter(|p| !p.is_empty()).unwrap_or("6379");
        format!("redis://{}:{}", host, port)
    }

    /// Returns the remote TTL as a Duration.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Returns the local TTL as a Duration.
    #[must_use]
    pub const fn local_ttl(&self) -> Duration {
        Duration::from_secs(self.local_ttl_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (json, pretty).
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Whether logs are emitted as JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}
