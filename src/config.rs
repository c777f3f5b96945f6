//! Application configuration loaded from environment variables.

use serde::Deserialize;
use url::Url;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Upstream APIs ===
    /// Base URL for the REST Countries API (country metadata).
    #[serde(default = "default_restcountries_api_url")]
    pub restcountries_api_url: String,

    /// Base URL for the CountriesNow API (cities and population).
    #[serde(default = "default_countriesnow_api_url")]
    pub countriesnow_api_url: String,

    // === HTTP Client ===
    /// Timeout for upstream requests in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    /// Maximum idle connections kept per upstream host.
    #[serde(default = "default_http_pool_size")]
    pub http_pool_size: usize,

    // === Status Probes ===
    /// Timeout for a single liveness probe in seconds.
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Path probed on the REST Countries API.
    #[serde(default = "default_restcountries_probe_path")]
    pub restcountries_probe_path: String,

    /// Path probed on the CountriesNow API.
    #[serde(default = "default_countriesnow_probe_path")]
    pub countriesnow_probe_path: String,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_restcountries_api_url() -> String {
    "http://129.241.150.113:8080/v3.1".to_string()
}

fn default_countriesnow_api_url() -> String {
    "http://129.241.150.113:3500/api/v0.1".to_string()
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

fn default_http_pool_size() -> usize {
    10
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_restcountries_probe_path() -> String {
    "/alpha/no".to_string()
}

fn default_countriesnow_probe_path() -> String {
    "/countries/iso".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        Url::parse(&self.restcountries_api_url)
            .map_err(|e| format!("RESTCOUNTRIES_API_URL is not a valid URL: {}", e))?;

        Url::parse(&self.countriesnow_api_url)
            .map_err(|e| format!("COUNTRIESNOW_API_URL is not a valid URL: {}", e))?;

        if self.http_timeout_ms == 0 {
            return Err("HTTP_TIMEOUT_MS must be greater than zero".to_string());
        }

        if self.probe_timeout_secs == 0 {
            return Err("PROBE_TIMEOUT_SECS must be greater than zero".to_string());
        }

        if !self.restcountries_probe_path.starts_with('/') {
            return Err("RESTCOUNTRIES_PROBE_PATH must start with '/'".to_string());
        }

        if !self.countriesnow_probe_path.starts_with('/') {
            return Err("COUNTRIESNOW_PROBE_PATH must start with '/'".to_string());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            restcountries_api_url: default_restcountries_api_url(),
            countriesnow_api_url: default_countriesnow_api_url(),
            http_timeout_ms: default_http_timeout_ms(),
            http_pool_size: default_http_pool_size(),
            probe_timeout_secs: default_probe_timeout_secs(),
            restcountries_probe_path: default_restcountries_probe_path(),
            countriesnow_probe_path: default_countriesnow_probe_path(),
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_sensible() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.probe_timeout_secs, 5);
        assert!(config.restcountries_api_url.starts_with("http"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_upstream_url() {
        let config = Config {
            restcountries_api_url: "not a url".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_probe_timeout() {
        let config = Config {
            probe_timeout_secs: 0,
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_relative_probe_path() {
        let config = Config {
            countriesnow_probe_path: "countries/iso".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }
}
