//! Container engine source (agent role).
//!
//! Queries the engine API directly, either over its local control socket or
//! over TCP when the engine is exposed that way (`DOCKER_HOST=tcp://...`).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use tracing::{debug, info};

use cluster_source_interface::{ClusterSource, RawPayload, ResourceKind, Result, SourceError};

use crate::policy::FetchPolicy;
use crate::response::{from_reqwest, into_payload};

/// Default location of the engine's control socket.
pub const DEFAULT_ENGINE_SOCKET: &str = "/var/run/docker.sock";

/// Environment variable conventionally pointing at the engine.
pub const ENGINE_HOST_ENV: &str = "DOCKER_HOST";

/// Where the engine API listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEndpoint {
    /// Local control socket.
    Unix(PathBuf),
    /// Base URL of an engine reachable over TCP.
    Http(String),
}

impl EngineEndpoint {
    /// `DOCKER_HOST` when set and valid, otherwise the default socket.
    pub fn from_env() -> Self {
        std::env::var(ENGINE_HOST_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl Default for EngineEndpoint {
    fn default() -> Self {
        EngineEndpoint::Unix(PathBuf::from(DEFAULT_ENGINE_SOCKET))
    }
}

impl FromStr for EngineEndpoint {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(path) = s.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(SourceError::Unsupported("empty socket path".to_string()));
            }
            return Ok(EngineEndpoint::Unix(PathBuf::from(path)));
        }
        if s.starts_with('/') {
            return Ok(EngineEndpoint::Unix(PathBuf::from(s)));
        }
        if let Some(addr) = s.strip_prefix("tcp://") {
            return Ok(EngineEndpoint::Http(format!(
                "http://{}",
                addr.trim_end_matches('/')
            )));
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(EngineEndpoint::Http(s.trim_end_matches('/').to_string()));
        }
        Err(SourceError::Unsupported(format!("engine endpoint '{}'", s)))
    }
}

impl fmt::Display for EngineEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineEndpoint::Unix(path) => write!(f, "unix://{}", path.display()),
            EngineEndpoint::Http(url) => f.write_str(url),
        }
    }
}

/// Configuration for [`EngineSource`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub endpoint: EngineEndpoint,
    /// Pin requests to an API version (`1.43` → `/v1.43/info`). Unversioned
    /// requests get the engine's default version.
    pub api_version: Option<String>,
}

/// Cluster source backed by the container engine API.
pub struct EngineSource {
    config: EngineConfig,
    policy: FetchPolicy,
    client: reqwest::Client,
}

impl EngineSource {
    pub fn new(config: EngineConfig, policy: FetchPolicy) -> Result<Self> {
        let client = reqwest::Client::builder().build().map_err(from_reqwest)?;

        info!(
            "EngineSource initialized for {} (timeout {:?}, {} attempt(s))",
            config.endpoint, policy.timeout, policy.attempts
        );

        Ok(Self {
            config,
            policy,
            client,
        })
    }

    /// Request path for `kind`, including the version prefix if pinned.
    pub fn request_path(&self, kind: ResourceKind) -> String {
        match self.config.api_version.as_deref().map(|v| v.trim_start_matches('v')) {
            Some(version) if !version.is_empty() => format!("/v{}{}", version, kind.engine_path()),
            _ => kind.engine_path().to_string(),
        }
    }

    async fn fetch_once(&self, kind: ResourceKind) -> Result<RawPayload> {
        let path = self.request_path(kind);
        debug!("Engine request: GET {}{}", self.config.endpoint, path);

        match &self.config.endpoint {
            EngineEndpoint::Unix(socket) => fetch_unix(socket, &path).await,
            EngineEndpoint::Http(base) => {
                let response = self
                    .client
                    .get(format!("{}{}", base, path))
                    .send()
                    .await
                    .map_err(from_reqwest)?;
                let status = response.status().as_u16();
                let body = response.bytes().await.map_err(from_reqwest)?;
                into_payload(status, &body)
            }
        }
    }
}

#[cfg(unix)]
async fn fetch_unix(socket: &std::path::Path, path: &str) -> Result<RawPayload> {
    let response = crate::unix_http::get(socket, path).await?;
    into_payload(response.status, &response.body)
}

#[cfg(not(unix))]
async fn fetch_unix(socket: &std::path::Path, _path: &str) -> Result<RawPayload> {
    Err(SourceError::Unsupported(format!(
        "unix socket {} on this platform",
        socket.display()
    )))
}

#[async_trait]
impl ClusterSource for EngineSource {
    async fn fetch_raw(&self, kind: ResourceKind) -> Result<RawPayload> {
        self.policy.run(kind, || self.fetch_once(kind)).await
    }

    fn describe(&self) -> String {
        format!("engine at {}", self.config.endpoint)
    }
}
