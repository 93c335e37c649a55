//! Daemon configuration: an optional `devicehub.toml` with environment
//! variable overrides on top.
//!
//! Every field is defaulted, so running without a file is fine.

use serde::Deserialize;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "devicehub.toml";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "sqlite:devicehub.db?mode=rwc";
const DEFAULT_LOG_FILTER: &str = "devicehubd=info,devicehub=info,tower_http=debug";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// `SQLite` database location, as an sqlx connection URL.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Log filter in `RUST_LOG` syntax.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Read [`CONFIG_FILE`] if it exists, then layer the process
    /// environment over it.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed, when an override
    /// carries an unparsable port, or when the result is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(CONFIG_FILE)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Apply `DEVICEHUB_*` overrides read through `lookup`.
    ///
    /// `DEVICEHUB_BIND` wins over `DEVICEHUB_HOST`/`DEVICEHUB_PORT`, and
    /// `RUST_LOG` wins over `DEVICEHUB_LOG`.
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DEVICEHUB_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("DEVICEHUB_PORT") {
            self.server.port = parse_port(&port)?;
        }
        if let Some(bind) = lookup("DEVICEHUB_BIND") {
            let (host, port) = bind
                .rsplit_once(':')
                .ok_or_else(|| ConfigError::Validation(format!("bind address {bind:?} has no port")))?;
            self.server.host = host.to_string();
            self.server.port = parse_port(port)?;
        }
        if let Some(url) = lookup("DEVICEHUB_DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(filter) = lookup("RUST_LOG").or_else(|| lookup("DEVICEHUB_LOG")) {
            self.logging.filter = filter;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.database.url.is_empty() {
            return Err(ConfigError::Validation(
                "database url must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` to listen on.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Validation(format!("invalid port {raw:?}")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Validation(String),
}
