//! Upstream relay source (gateway role).
//!
//! Fetches raw payloads from another dashboard service over plain HTTP so
//! that a gateway exposes the same API without access to the engine.

use async_trait::async_trait;
use tracing::{debug, info};

use cluster_source_interface::{ClusterSource, RawPayload, ResourceKind, Result, SourceError};

use crate::policy::FetchPolicy;
use crate::response::{from_reqwest, into_payload};

pub use cluster_source_interface::{DEFAULT_RELAY_PREFIX, LEGACY_AGENT_PREFIX};

/// Configuration for [`RelaySource`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Upstream base URL, e.g. `http://agent:8090`.
    pub base_url: String,
    /// Path prefix placed before the resource segment.
    pub path_prefix: String,
}

impl RelayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path_prefix: DEFAULT_RELAY_PREFIX.to_string(),
        }
    }

    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }
}

/// Cluster source that relays to an upstream dashboard service.
pub struct RelaySource {
    base_url: String,
    path_prefix: String,
    policy: FetchPolicy,
    client: reqwest::Client,
}

impl RelaySource {
    pub fn new(config: RelayConfig, policy: FetchPolicy) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SourceError::Unsupported(format!(
                "upstream URL '{}' must start with http:// or https://",
                config.base_url
            )));
        }

        let path_prefix = normalize_prefix(&config.path_prefix);
        let client = reqwest::Client::builder().build().map_err(from_reqwest)?;

        info!(
            "RelaySource initialized for {}{} (timeout {:?}, {} attempt(s))",
            base_url, path_prefix, policy.timeout, policy.attempts
        );

        Ok(Self {
            base_url,
            path_prefix,
            policy,
            client,
        })
    }

    /// Full upstream URL for `kind`.
    pub fn url(&self, kind: ResourceKind) -> String {
        format!("{}{}/{}", self.base_url, self.path_prefix, kind.relay_segment())
    }

    async fn fetch_once(&self, kind: ResourceKind) -> Result<RawPayload> {
        let url = self.url(kind);
        debug!("Relay request: GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(from_reqwest)?;
        into_payload(status, &body)
    }
}

/// `api/x/` → `/api/x`; empty stays empty.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[async_trait]
impl ClusterSource for RelaySource {
    async fn fetch_raw(&self, kind: ResourceKind) -> Result<RawPayload> {
        self.policy.run(kind, || self.fetch_once(kind)).await
    }

    fn describe(&self) -> String {
        format!("upstream at {}{}", self.base_url, self.path_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_urls() {
        let relay = RelaySource::new(RelayConfig::new("http://agent:8090/"), FetchPolicy::default()).unwrap();
        assert_eq!(relay.url(ResourceKind::Info), "http://agent:8090/api/docker/raw/health");
        assert_eq!(relay.url(ResourceKind::Nodes), "http://agent:8090/api/docker/raw/nodes");

        let legacy = RelaySource::new(
            RelayConfig::new("http://agent:8090").with_path_prefix("api/docker/"),
            FetchPolicy::default(),
        )
        .unwrap();
        assert_eq!(legacy.url(ResourceKind::Services), "http://agent:8090/api/docker/services");

        let bare = RelaySource::new(
            RelayConfig::new("http://agent:8090").with_path_prefix(""),
            FetchPolicy::default(),
        )
        .unwrap();
        assert_eq!(bare.url(ResourceKind::Nodes), "http://agent:8090/nodes");
    }

    #[test]
    fn test_rejects_non_http_upstream() {
        let result = RelaySource::new(RelayConfig::new("agent:8090"), FetchPolicy::default());
        assert!(matches!(result, Err(SourceError::Unsupported(_))));
    }
}
