//! Application configuration module
//!
//! Provides the server configuration, a builder for tests and embedding,
//! and loading from environment variables for the binary.

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

/// Secret used when `JWT_SECRET` is not set. Development only.
pub const DEV_JWT_SECRET: &str = "parley-dev-secret-change-in-production";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BROADCAST_CAPACITY: usize = 1000;
const DEFAULT_HISTORY_PAGE_LIMIT: u32 = 30;
const DEFAULT_MAX_HISTORY_PAGE_LIMIT: u32 = 100;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP/WebSocket listener binds to
    pub bind_addr: SocketAddr,
    /// Postgres URL; `None` runs on in-memory stores
    pub database_url: Option<String>,
    /// HMAC secret shared with the login service
    pub jwt_secret: String,
    /// Capacity of the presence broadcast channel
    pub broadcast_capacity: usize,
    /// History page size when the client does not ask for one
    pub history_page_limit: u32,
    /// Largest history page a client may request
    pub max_history_page_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            database_url: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
            history_page_limit: DEFAULT_HISTORY_PAGE_LIMIT,
            max_history_page_limit: DEFAULT_MAX_HISTORY_PAGE_LIMIT,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from the process environment
    ///
    /// Reads `SERVER_HOST`, `SERVER_PORT`, `DATABASE_URL`, `JWT_SECRET`,
    /// `BROADCAST_CAPACITY`, `HISTORY_PAGE_LIMIT` and
    /// `MAX_HISTORY_PAGE_LIMIT`. Unset variables fall back to defaults.
    /// Token lifetime is chosen by the login service that issues tokens.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = AppConfig::builder();

        let host = match lookup("SERVER_HOST") {
            Some(raw) => raw
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidValue("SERVER_HOST", raw))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };
        let port = parse_or("SERVER_PORT", lookup("SERVER_PORT"), DEFAULT_PORT)?;
        builder = builder.bind_addr(SocketAddr::new(host, port));

        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            builder = builder.database_url(url);
        }
        match lookup("JWT_SECRET") {
            Some(secret) => builder = builder.jwt_secret(secret),
            None => tracing::warn!("JWT_SECRET not set, using the development secret"),
        }

        builder = builder
            .broadcast_capacity(parse_or(
                "BROADCAST_CAPACITY",
                lookup("BROADCAST_CAPACITY"),
                DEFAULT_BROADCAST_CAPACITY,
            )?)
            .history_page_limit(parse_or(
                "HISTORY_PAGE_LIMIT",
                lookup("HISTORY_PAGE_LIMIT"),
                DEFAULT_HISTORY_PAGE_LIMIT,
            )?)
            .max_history_page_limit(parse_or(
                "MAX_HISTORY_PAGE_LIMIT",
                lookup("MAX_HISTORY_PAGE_LIMIT"),
                DEFAULT_MAX_HISTORY_PAGE_LIMIT,
            )?);

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if self.broadcast_capacity == 0 {
            return Err(ConfigError::InvalidValue("BROADCAST_CAPACITY", "0".to_string()));
        }
        if self.history_page_limit == 0 || self.history_page_limit > self.max_history_page_limit {
            return Err(ConfigError::InvalidValue(
                "HISTORY_PAGE_LIMIT",
                self.history_page_limit.to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default),
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = secret.into();
        self
    }

    pub fn broadcast_capacity(mut self, capacity: usize) -> Self {
        self.config.broadcast_capacity = capacity;
        self
    }

    pub fn history_page_limit(mut self, limit: u32) -> Self {
        self.config.history_page_limit = limit;
        self
    }

    pub fn max_history_page_limit(mut self, limit: u32) -> Self {
        self.config.max_history_page_limit = limit;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
