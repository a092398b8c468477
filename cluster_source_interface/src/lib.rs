//! Interface between the dashboard API and wherever cluster state comes from.
//!
//! The API never talks to the container engine directly. It asks a
//! [`ClusterSource`] for the raw payload of a [`ResourceKind`] and normalizes
//! whatever comes back. Agents plug in a source that queries the engine's
//! control socket; gateways plug in one that relays to an upstream agent.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

/// Raw passthrough routes of a dashboard agent, relative to its base URL.
pub const DEFAULT_RELAY_PREFIX: &str = "/api/docker/raw";

/// Routes of agents that serve engine JSON on the plain dashboard paths.
pub const LEGACY_AGENT_PREFIX: &str = "/api/docker";

/// Undecoded JSON exactly as the source produced it.
pub type RawPayload = serde_json::Value;

/// The three pieces of cluster state the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Engine system info, including the swarm section.
    Info,
    Nodes,
    Services,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [ResourceKind::Info, ResourceKind::Nodes, ResourceKind::Services];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Info => "info",
            ResourceKind::Nodes => "nodes",
            ResourceKind::Services => "services",
        }
    }

    /// Path of this resource on the container engine API.
    pub fn engine_path(&self) -> &'static str {
        match self {
            ResourceKind::Info => "/info",
            ResourceKind::Nodes => "/nodes",
            ResourceKind::Services => "/services",
        }
    }

    /// Last path segment of this resource on a dashboard service.
    ///
    /// Engine info is published as `health`, matching the dashboard route.
    pub fn relay_segment(&self) -> &'static str {
        match self {
            ResourceKind::Info => "health",
            ResourceKind::Nodes => "nodes",
            ResourceKind::Services => "services",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-level failures. Shape problems inside a well-formed payload are
/// not errors; they are absorbed by the normalization defaults.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed HTTP response: {0}")]
    Protocol(String),

    #[error("invalid JSON payload: {0}")]
    Decode(String),

    #[error("unsupported endpoint: {0}")]
    Unsupported(String),
}

impl SourceError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        SourceError::Status {
            status,
            message: message.into(),
        }
    }

    /// Short, stable name of the failure class, for metric labels.
    pub fn label(&self) -> &'static str {
        match self {
            SourceError::Connect(_) => "connect",
            SourceError::Timeout(_) => "timeout",
            SourceError::Status { .. } => "status",
            SourceError::Protocol(_) => "protocol",
            SourceError::Decode(_) => "decode",
            SourceError::Unsupported(_) => "unsupported",
        }
    }

    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Connect(_) | SourceError::Timeout(_) | SourceError::Protocol(_) => true,
            SourceError::Status { status, .. } => *status >= 500,
            SourceError::Decode(_) | SourceError::Unsupported(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// A provider of raw cluster state.
#[async_trait]
pub trait ClusterSource: Send + Sync {
    /// Fetch the current raw payload for `kind`. Every call reflects live
    /// state; implementations do not cache.
    async fn fetch_raw(&self, kind: ResourceKind) -> Result<RawPayload>;

    /// Human-readable description of where data comes from, for logs.
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths() {
        assert_eq!(ResourceKind::Info.engine_path(), "/info");
        assert_eq!(ResourceKind::Info.relay_segment(), "health");
        assert_eq!(ResourceKind::Nodes.relay_segment(), "nodes");
        assert_eq!(ResourceKind::Services.engine_path(), "/services");
        assert_eq!(ResourceKind::Services.to_string(), "services");
    }

    #[test]
    fn test_retryable_errors() {
        assert!(SourceError::Connect("refused".into()).is_retryable());
        assert!(SourceError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(SourceError::status(503, "unavailable").is_retryable());
        assert!(!SourceError::status(404, "page not found").is_retryable());
        assert!(!SourceError::Decode("eof".into()).is_retryable());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SourceError::status(500, "Failed to fetch nodes").to_string(),
            "HTTP 500: Failed to fetch nodes"
        );
        assert_eq!(
            SourceError::Connect("No such file or directory".into()).to_string(),
            "connection failed: No such file or directory"
        );
    }

    struct Fixed;

    #[async_trait]
    impl ClusterSource for Fixed {
        async fn fetch_raw(&self, kind: ResourceKind) -> Result<RawPayload> {
            Ok(serde_json::json!({ "kind": kind.as_str() }))
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let source: Box<dyn ClusterSource> = Box::new(Fixed);
        let payload = source.fetch_raw(ResourceKind::Nodes).await.unwrap();
        assert_eq!(payload["kind"], "nodes");
        assert_eq!(source.describe(), "fixed");
    }
}
