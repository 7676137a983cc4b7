//! Application configuration
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides. The loaded value is constructed once in `main` and passed
//! down explicitly; there is no global configuration instance.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::system::logging::format::DEFAULT_PATTERN;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: EndpointConfig,
    pub tick: TickConfig,
    pub logging: LoggingConfig,
}

/// Control endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Well-known socket path shared by all invocations of the program
    pub socket_path: String,
    /// Bound for the server-side read and the client-side connect/write
    pub io_timeout_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            socket_path: "./dynalog.sock".to_string(),
            io_timeout_ms: 1000,
        }
    }
}

impl EndpointConfig {
    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }
}

/// Periodic tick configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    pub interval_ms: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

impl TickConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Initial filter directives (EnvFilter syntax)
    pub level: String,
    /// Initial message pattern, e.g. `%{time} %{level} %{target}: %{message}`
    pub pattern: String,
    /// Optional log file; output is teed to stderr and the file
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            pattern: DEFAULT_PATTERN.to_string(),
            file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file with environment variable fallback
    pub fn load() -> Self {
        let mut config = Self::load_from_file();
        config.override_with_env();
        config
    }

    /// Load configuration from TOML file
    fn load_from_file() -> Self {
        let config_paths = ["dynalog.toml", "config.toml", "/etc/dynalog/config.toml"];

        for path in &config_paths {
            if Path::new(path).exists() {
                debug!("Loading config from: {}", path);
                match fs::read_to_string(path) {
                    Ok(content) => match toml::from_str::<AppConfig>(&content) {
                        Ok(config) => {
                            debug!("Successfully loaded config from: {}", path);
                            return config;
                        }
                        Err(e) => {
                            warn!("Failed to parse config file {}: {}", path, e);
                        }
                    },
                    Err(e) => {
                        warn!("Failed to read config file {}: {}", path, e);
                    }
                }
            }
        }

        debug!("No config file found, using defaults");
        Self::default()
    }

    /// Override configuration with environment variables
    fn override_with_env(&mut self) {
        if let Ok(path) = env::var("DYNALOG_SOCKET") {
            self.endpoint.socket_path = path;
        }
        if let Ok(timeout) = env::var("DYNALOG_IO_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                self.endpoint.io_timeout_ms = ms;
            } else {
                error!("Invalid DYNALOG_IO_TIMEOUT_MS: {}", timeout);
            }
        }
        if let Ok(interval) = env::var("DYNALOG_TICK_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.tick.interval_ms = ms;
            } else {
                error!("Invalid DYNALOG_TICK_INTERVAL_MS: {}", interval);
            }
        }

        // Logging config
        if let Ok(level) = env::var("RUST_LOG") {
            self.logging.level = level;
        }
        if let Ok(pattern) = env::var("DYNALOG_LOG_PATTERN") {
            self.logging.pattern = pattern;
        }
        if let Ok(file) = env::var("DYNALOG_LOG_FILE") {
            self.logging.file = Some(file);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = AppConfig::default();
        assert_eq!(config.endpoint.socket_path, "./dynalog.sock");
        assert_eq!(config.endpoint.io_timeout(), Duration::from_secs(1));
        assert_eq!(config.tick.interval(), Duration::from_secs(1));
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [endpoint]
            socket_path = "/tmp/other.sock"
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.endpoint.socket_path, "/tmp/other.sock");
        assert_eq!(config.endpoint.io_timeout_ms, 1000);
        assert_eq!(config.tick.interval_ms, 1000);
    }
}
