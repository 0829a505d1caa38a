//! Configuration management for the broker simulator

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Logging configuration
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// `text` or `json`
    pub log_format: String,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            service_name: "multibroker".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// `HTTP_PORT` wins over `PORT`, which hosting platforms set on their own.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let http_port = match lookup("HTTP_PORT").or_else(|| lookup("PORT")) {
            Some(port) => port
                .parse()
                .with_context(|| format!("Invalid HTTP_PORT: {port}"))?,
            None => defaults.http_port,
        };

        let log_format = lookup("LOG_FORMAT").unwrap_or(defaults.telemetry.log_format);
        if log_format != "text" && log_format != "json" {
            anyhow::bail!("Invalid LOG_FORMAT: {log_format} (expected 'text' or 'json')");
        }

        Ok(Self {
            http_host: lookup("HTTP_HOST").unwrap_or(defaults.http_host),
            http_port,
            telemetry: TelemetryConfig {
                log_format,
                service_name: lookup("SERVICE_NAME").unwrap_or(defaults.telemetry.service_name),
            },
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.http_addr(), "0.0.0.0:8080");
        assert_eq!(config.telemetry.log_format, "text");
        assert_eq!(config.telemetry.service_name, "multibroker");
    }

    #[test]
    fn test_port_fallback() {
        let config = Config::from_lookup(lookup_from(&[("PORT", "9000")])).unwrap();
        assert_eq!(config.http_port, 9000);

        let config =
            Config::from_lookup(lookup_from(&[("PORT", "9000"), ("HTTP_PORT", "9100")])).unwrap();
        assert_eq!(config.http_port, 9100);
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup_from(&[("HTTP_PORT", "not-a-port")])).unwrap_err();
        assert!(err.to_string().contains("Invalid HTTP_PORT"));
    }

    #[test]
    fn test_invalid_log_format() {
        assert!(Config::from_lookup(lookup_from(&[("LOG_FORMAT", "xml")])).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("HTTP_HOST", "127.0.0.1"),
            ("LOG_FORMAT", "json"),
            ("SERVICE_NAME", "hydra"),
        ]))
        .unwrap();
        assert_eq!(config.http_host, "127.0.0.1");
        assert_eq!(config.telemetry.log_format, "json");
        assert_eq!(config.telemetry.service_name, "hydra");
    }
}
