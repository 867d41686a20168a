//! Simulator configuration.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::{ServerError, ServerResult};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("Unknown log format: {other}")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Main simulator configuration.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub port: u16,
    /// Deployment environment reported by the banner.
    pub environment: String,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Expose `/metrics`.
    pub metrics_enabled: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            port: 30001,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
        }
    }
}

impl SimulatorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Unparseable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("CBS_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Some(port) = lookup("PORT") {
            if let Ok(port) = port.trim().parse() {
                config.port = port;
            }
        }

        if let Some(environment) = lookup("CBS_ENVIRONMENT").or_else(|| lookup("NODE_ENV")) {
            config.environment = environment;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        if let Some(format) = lookup("CBS_LOG_FORMAT") {
            if let Ok(format) = format.parse() {
                config.log_format = format;
            }
        }

        if let Some(enabled) = lookup("CBS_METRICS_ENABLED") {
            if let Some(enabled) = parse_flag(&enabled) {
                config.metrics_enabled = enabled;
            }
        }

        config
    }

    /// `host:port` string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.port)
    }

    /// Validate configuration.
    pub fn validate(&self) -> ServerResult<()> {
        if self.port == 0 {
            return Err(ServerError::Config("Listen port cannot be 0".to_string()));
        }

        if self.listen_addr.parse::<IpAddr>().is_err() {
            return Err(ServerError::Config(format!(
                "Invalid listen address: {}",
                self.listen_addr
            )));
        }

        if self.environment.trim().is_empty() {
            return Err(ServerError::Config("Environment cannot be empty".to_string()));
        }

        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(ServerError::Config(format!(
                "Invalid log level: {}",
                self.log_level
            )));
        }

        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = SimulatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr(), "0.0.0.0:30001");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = SimulatorConfig::default();
        config.port = 0;
        assert!(config.validate().is_err());

        let mut config = SimulatorConfig::default();
        config.listen_addr = "not-an-ip".to_string();
        assert!(config.validate().is_err());

        let mut config = SimulatorConfig::default();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_lookup_overrides() {
        let config = SimulatorConfig::from_lookup(lookup(&[
            ("CBS_LISTEN_ADDR", "127.0.0.1"),
            ("PORT", "8080"),
            ("NODE_ENV", "production"),
            ("LOG_LEVEL", "debug"),
            ("CBS_LOG_FORMAT", "JSON"),
            ("CBS_METRICS_ENABLED", "false"),
        ]));

        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.environment, "production");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.metrics_enabled);
    }

    #[test]
    fn test_environment_prefers_own_variable() {
        let config = SimulatorConfig::from_lookup(lookup(&[
            ("CBS_ENVIRONMENT", "staging"),
            ("NODE_ENV", "production"),
        ]));
        assert_eq!(config.environment, "staging");
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let config = SimulatorConfig::from_lookup(lookup(&[
            ("PORT", "eighty"),
            ("CBS_LOG_FORMAT", "xml"),
            ("CBS_METRICS_ENABLED", "maybe"),
        ]));
        assert_eq!(config.port, 30001);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.metrics_enabled);
    }
}
