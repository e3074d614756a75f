//! Server configuration management.
//!
//! Configuration is layered: built-in defaults, then an optional TOML
//! file, then `OPTIONLAB_*` environment variables, then CLI flags.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels supported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to a tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Server configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Log level
    pub log_level: LogLevel,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: LogLevel::Info,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file over the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileError` when the file cannot be read or
    /// parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileError(e.to_string()))?;
        toml::from_str(&text).map_err(|e| ConfigError::FileError(e.to_string()))
    }

    /// Applies `OPTIONLAB_HOST`, `OPTIONLAB_PORT` and `OPTIONLAB_LOG_LEVEL`
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when an override fails to parse.
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(host) = std::env::var("OPTIONLAB_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("OPTIONLAB_PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Ok(level) = std::env::var("OPTIONLAB_LOG_LEVEL") {
            self.log_level = level.parse()?;
        }
        Ok(self)
    }
}
