//! Configuration file for the swarm dashboard services.
//!
//! The file is optional TOML. Every section and field has a default, so a
//! partial file only overrides what it names:
//!
//! ```toml
//! [server]
//! port = 3001
//!
//! [gateway]
//! upstream_url = "http://swarm-agent:8090"
//! frontend_url = "https://dashboard.example.com"
//!
//! [fetch]
//! timeout_secs = 5
//! ```
//!
//! Command-line flags and environment variables override the file; that merge
//! happens in the binaries.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cluster_source_interface::DEFAULT_RELAY_PREFIX;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Directory under the user's config dir holding the config file.
pub const CONFIG_DIR_NAME: &str = "swarm-dashboard";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_AGENT_PORT: u16 = 8090;
pub const DEFAULT_GATEWAY_PORT: u16 = 3001;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Root of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub server: ServerConfig,
    pub agent: AgentConfig,
    pub gateway: GatewayConfig,
    pub fetch: FetchConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// HTTP listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// Unset means the role's default port.
    pub port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: None,
        }
    }
}

/// Agent role: direct engine access.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Engine endpoint (`unix:///var/run/docker.sock`, `tcp://host:2375`).
    /// Unset means `DOCKER_HOST`, then the default socket.
    pub engine_host: Option<String>,
    /// Pin engine API requests to a version, e.g. `1.43`.
    pub api_version: Option<String>,
}

/// Gateway role: relay to an upstream agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub upstream_url: Option<String>,
    /// Path prefix of the upstream's raw routes.
    pub upstream_path_prefix: String,
    /// Allowed CORS origin. Unset allows any origin.
    pub frontend_url: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            upstream_url: None,
            upstream_path_prefix: DEFAULT_RELAY_PREFIX.to_string(),
            frontend_url: None,
        }
    }
}

/// Timeout and retry policy for engine and upstream fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            attempts: 2,
            retry_delay_ms: 250,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Used when `RUST_LOG` is not set.
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,tower_http=debug".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prometheus scrape address. Unset disables the exporter.
    pub listen: Option<SocketAddr>,
}

impl DashboardConfig {
    /// `$XDG_CONFIG_HOME/swarm-dashboard/config.toml` or the platform equivalent.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `explicit` if given (it must exist); otherwise the default path
    /// if present; otherwise built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch.attempts == 0 {
            return Err(ConfigError::Invalid(
                "fetch.attempts must be at least 1".to_string(),
            ));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "fetch.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if let Some(url) = &self.gateway.upstream_url {
            validate_http_url("gateway.upstream_url", url)?;
        }
        if let Some(origin) = &self.gateway.frontend_url {
            if origin.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "gateway.frontend_url must not be empty".to_string(),
                ));
            }
        }
        if self.server.port == Some(0) {
            return Err(ConfigError::Invalid("server.port must not be 0".to_string()));
        }
        Ok(())
    }
}

fn validate_http_url(field: &str, url: &str) -> Result<()> {
    let url = url.trim();
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(ConfigError::Invalid(format!(
            "{} must be an http(s) URL, got '{}'",
            field, url
        ))),
    }
}
