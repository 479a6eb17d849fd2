use crate::error::ConfigError;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; missing sections fall back to `Default`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub window: WindowSettings,
    pub logging: LoggingSettings,
}

/// Where and how the HTTP adapter listens.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// An IP address literal, e.g. "0.0.0.0" or "::1".
    pub host: String,
    pub port: u16,
    /// Largest accepted request body for `POST /event`.
    pub body_limit_bytes: usize,
}

/// Parameters for the rolling-window aggregator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Length of the trailing window in milliseconds. Must be positive.
    pub duration_millis: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive. `RUST_LOG` takes precedence when set.
    pub filter: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---
// This allows a user to omit any section from their toml
// and still have it work with sensible defaults.

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            duration_millis: 60_000,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            directory: None,
        }
    }
}

impl Settings {
    /// Rejects values the rest of the application cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.duration_millis <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "window.duration_millis must be positive, got {}",
                self.window.duration_millis
            )));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must not be 0".to_string(),
            ));
        }
        if self.server.body_limit_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "server.body_limit_bytes must be positive".to_string(),
            ));
        }
        self.server.socket_addr()?;
        Ok(())
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = self.host.parse::<IpAddr>().map_err(|e| {
            ConfigError::ValidationError(format!("server.host {:?} is not an IP address: {e}", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Command-line values that take precedence over the file and the environment.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct SettingsOverrides {
    /// IP address to bind the HTTP server to.
    #[cfg_attr(feature = "clap", arg(long))]
    pub host: Option<String>,

    /// Port to bind the HTTP server to.
    #[cfg_attr(feature = "clap", arg(long))]
    pub port: Option<u16>,

    /// Length of the rolling window in milliseconds.
    #[cfg_attr(feature = "clap", arg(long))]
    pub window_millis: Option<i64>,

    /// Log filter directive, e.g. "info" or "aggregator=debug".
    #[cfg_attr(feature = "clap", arg(long))]
    pub log_filter: Option<String>,
}

impl SettingsOverrides {
    /// Applies the overrides and re-validates the result.
    pub fn apply(self, mut settings: Settings) -> Result<Settings, ConfigError> {
        if let Some(host) = self.host {
            settings.server.host = host;
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(window_millis) = self.window_millis {
            settings.window.duration_millis = window_millis;
        }
        if let Some(filter) = self.log_filter {
            settings.logging.filter = filter;
        }
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();

        assert!(settings.validate().is_ok());
        assert_eq!(settings.window.duration_millis, 60_000);
        assert_eq!(
            settings.server.socket_addr().unwrap(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn rejects_a_non_positive_window() {
        let mut settings = Settings::default();
        settings.window.duration_millis = 0;

        assert!(matches!(settings.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn rejects_a_host_that_is_not_an_ip() {
        let mut settings = Settings::default();
        settings.server.host = "localhost".to_string();

        assert!(matches!(settings.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn accepts_ipv6_hosts() {
        let mut settings = Settings::default();
        settings.server.host = "::1".to_string();

        assert_eq!(
            settings.server.socket_addr().unwrap(),
            "[::1]:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn overrides_replace_only_what_they_set() {
        let overrides = SettingsOverrides {
            port: Some(9000),
            window_millis: Some(5_000),
            ..Default::default()
        };

        let settings = overrides.apply(Settings::default()).unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.window.duration_millis, 5_000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.logging.filter, "info");
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let overrides = SettingsOverrides {
            window_millis: Some(-1),
            ..Default::default()
        };

        assert!(overrides.apply(Settings::default()).is_err());
    }
}
