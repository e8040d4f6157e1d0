//! Service configuration.
//!
//! Settings come from built-in defaults, then an optional TOML file, then
//! environment variables, each layer overriding the previous one.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8000
//!
//! [database]
//! path = "stpaul_incidents.sqlite3"
//! max_connections = 4
//! busy_timeout_ms = 5000
//! create_table = true
//! ```
//!
//! # Environment Variables
//!
//! - `INCIDENTS_CONFIG`: Config file to load (default: `incidents.toml` if present)
//! - `HOST`: Server host
//! - `PORT`: Server port
//! - `DATABASE_PATH`: SQLite database file, or `:memory:`
//! - `DB_POOL_MAX`: Maximum pooled connections
//! - `DB_BUSY_TIMEOUT_MS`: Lock wait for SQLite connections

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "INCIDENTS_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "incidents.toml";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{key} must be a valid {expected}, got '{value}'")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// SQLite store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub path: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
    pub create_table: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "stpaul_incidents.sqlite3".to_string(),
            max_connections: 4,
            busy_timeout_ms: 5000,
            create_table: true,
        }
    }
}

#[cfg(feature = "sqlite-repo")]
impl DatabaseSettings {
    /// Convert to the repository's connection settings.
    pub fn to_sqlite_config(&self) -> crate::db::SqliteConfig {
        crate::db::SqliteConfig {
            database_path: self.path.clone(),
            max_pool_size: self.max_connections,
            busy_timeout_ms: self.busy_timeout_ms,
            create_table: self.create_table,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the process configuration.
    ///
    /// Reads the file named by `INCIDENTS_CONFIG` (which must exist), or
    /// `incidents.toml` when it exists, then applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides looked up by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_value("PORT", port, "port number")?;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            self.database.path = path;
        }
        if let Some(max) = lookup("DB_POOL_MAX") {
            self.database.max_connections = parse_value("DB_POOL_MAX", max, "connection count")?;
        }
        if let Some(timeout) = lookup("DB_BUSY_TIMEOUT_MS") {
            self.database.busy_timeout_ms =
                parse_value("DB_BUSY_TIMEOUT_MS", timeout, "duration in milliseconds")?;
        }
        Ok(())
    }

    /// `host:port` to bind the listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: FromStr>(
    key: &'static str,
    value: String,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value,
            expected,
        })
}
