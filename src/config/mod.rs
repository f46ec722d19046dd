//! Configuration loading and management
//!
//! Deployment settings come from an optional YAML file (path in
//! `ORDERSYSTEM_CONFIG`) overlaid with environment variables. Database
//! settings are environment-only and required when the durable backend is
//! selected.

use crate::core::{ConfigError, ServiceOptions};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Path of the YAML configuration file
pub const CONFIG_PATH_VAR: &str = "ORDERSYSTEM_CONFIG";
pub const BACKEND_VAR: &str = "ORDERSYSTEM_BACKEND";
pub const ADDR_VAR: &str = "ORDERSYSTEM_ADDR";
pub const REQUIRE_KNOWN_DRINK_VAR: &str = "ORDERSYSTEM_REQUIRE_KNOWN_DRINK";

pub const DB_HOST_VAR: &str = "DB_HOST";
pub const DB_USER_VAR: &str = "POSTGRES_USER";
pub const DB_PASSWORD_VAR: &str = "POSTGRES_PASSWORD";
pub const DB_NAME_VAR: &str = "POSTGRES_DB";
pub const DB_PORT_VAR: &str = "POSTGRES_TCP_PORT";
pub const DB_MAX_CONNECTIONS_VAR: &str = "DB_MAX_CONNECTIONS";
pub const DB_QUERY_TIMEOUT_VAR: &str = "DB_QUERY_TIMEOUT_SECS";

/// Which store backs the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Volatile, process-lifetime state
    #[default]
    InMemory,
    /// PostgreSQL, survives restarts
    Postgres,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in-memory" | "memory" => Ok(Backend::InMemory),
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            other => Err(ConfigError::InvalidValue {
                field: BACKEND_VAR.to_string(),
                value: other.to_string(),
                message: "expected 'in-memory' or 'postgres'".to_string(),
            }),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the combined REST (and gRPC) server binds to
    #[serde(default = "default_addr")]
    pub addr: String,

    #[serde(default)]
    pub backend: Backend,

    #[serde(default)]
    pub service: ServiceOptions,
}

fn default_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            backend: Backend::default(),
            service: ServiceOptions::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => Self::from_yaml_file(&path)?,
            None => Self::default(),
        };
        config.with_overrides(lookup)
    }

    /// Apply environment overrides on top of this configuration
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup(BACKEND_VAR) {
            self.backend = backend.parse()?;
        }
        if let Some(addr) = lookup(ADDR_VAR) {
            self.addr = addr;
        }
        if let Some(flag) = lookup(REQUIRE_KNOWN_DRINK_VAR) {
            self.service.require_known_drink = parse_bool(REQUIRE_KNOWN_DRINK_VAR, &flag)?;
        }
        Ok(self)
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            message: "expected a boolean".to_string(),
        }),
    }
}

fn parse_number<T: FromStr>(field: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: "expected a number".to_string(),
    })
}

/// Connection settings for the durable store
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: u16,
    pub max_connections: u32,
    /// Upper bound for one store operation, pool acquisition included
    pub query_timeout: Duration,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("port", &self.port)
            .field("max_connections", &self.max_connections)
            .field("query_timeout", &self.query_timeout)
            .finish()
    }
}

impl DatabaseConfig {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
    pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

    /// Read settings from the process environment
    ///
    /// Every connection value is required; the first missing one is reported.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required =
            |key: &str| lookup(key).ok_or_else(|| ConfigError::MissingVar(key.to_string()));

        let user = required(DB_USER_VAR)?;
        let password = required(DB_PASSWORD_VAR)?;
        let database = required(DB_NAME_VAR)?;
        let port = parse_number(DB_PORT_VAR, &required(DB_PORT_VAR)?)?;
        let host = required(DB_HOST_VAR)?;

        let max_connections = match lookup(DB_MAX_CONNECTIONS_VAR) {
            Some(v) => parse_number(DB_MAX_CONNECTIONS_VAR, &v)?,
            None => Self::DEFAULT_MAX_CONNECTIONS,
        };
        let query_timeout = match lookup(DB_QUERY_TIMEOUT_VAR) {
            Some(v) => Duration::from_secs(parse_number(DB_QUERY_TIMEOUT_VAR, &v)?),
            None => Self::DEFAULT_QUERY_TIMEOUT,
        };

        Ok(Self {
            host,
            user,
            password,
            database,
            port,
            max_connections,
            query_timeout,
        })
    }

    /// sqlx connection options for these settings
    #[cfg(feature = "postgres")]
    pub fn connect_options(&self) -> sqlx::postgres::PgConnectOptions {
        sqlx::postgres::PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}
