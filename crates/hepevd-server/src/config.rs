//! Configuration loading and typed config structures for the event display.
//!
//! Configuration is optional: every field has a default, so an embedding
//! host can use [`HepEvdConfig::default`] directly. A YAML file (see
//! `hepevd-config.yaml` at the workspace root) can override any field,
//! and a few environment variables override the file.

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default TCP port the viewer is served on.
pub const DEFAULT_PORT: u16 = 5555;

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Viewer assets shipped with this crate.
const BUNDLED_WEB_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/web");

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override had a value that could not be used.
    #[error("invalid value for {name}: {value:?} ({reason})")]
    InvalidEnv {
        /// The environment variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HepEvdConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings, consumed by the host when it sets up `tracing`.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HepEvdConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `HEPEVD_HOST` overrides `server.host`
    /// - `HEPEVD_PORT` overrides `server.port`
    /// - `HEPEVD_WEB_ROOT` overrides `server.web_root`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidEnv`] if an override cannot be parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.server.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Host to bind. Must resolve to a loopback address.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory the viewer's static files are served from.
    #[serde(default = "default_web_root")]
    pub web_root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            web_root: default_web_root(),
        }
    }
}

impl ServerConfig {
    /// Apply `HEPEVD_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if `HEPEVD_PORT` is not a port.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary lookup (environment, test map).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if `HEPEVD_PORT` is not a port.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("HEPEVD_HOST") {
            self.host = val;
        }
        if let Some(val) = lookup("HEPEVD_PORT") {
            self.port = val.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidEnv {
                    name: "HEPEVD_PORT",
                    value: val.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(val) = lookup("HEPEVD_WEB_ROOT") {
            self.web_root = PathBuf::from(val);
        }
        Ok(())
    }

    /// Resolve `host` to a loopback IP address.
    ///
    /// `localhost` maps to `127.0.0.1`. Returns `None` for anything that is
    /// not a loopback literal.
    pub fn loopback_ip(&self) -> Option<IpAddr> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Some(IpAddr::V4(Ipv4Addr::LOCALHOST));
        }
        self.host
            .parse::<IpAddr>()
            .ok()
            .filter(IpAddr::is_loopback)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_host() -> String {
    String::from(DEFAULT_HOST)
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_web_root() -> PathBuf {
    PathBuf::from(BUNDLED_WEB_ROOT)
}

fn default_log_level() -> String {
    String::from("info")
}
