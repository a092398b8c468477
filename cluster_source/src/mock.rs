//! In-memory cluster source for tests and local development.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;

use cluster_source_interface::{ClusterSource, RawPayload, ResourceKind, Result, SourceError};

/// Canned outcome for one resource kind.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Payload(RawPayload),
    Error(SourceError),
}

/// Cluster source answering from configured responses.
///
/// Kinds without a configured response fail with [`SourceError::Connect`],
/// the same way an unreachable engine would.
#[derive(Debug, Default)]
pub struct MockSource {
    responses: RwLock<HashMap<ResourceKind, MockResponse>>,
    calls: RwLock<HashMap<ResourceKind, usize>>,
    delay: Option<Duration>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Three-node swarm with one manager and two services.
    pub fn sample_swarm() -> Self {
        Self::new()
            .with_payload(ResourceKind::Info, sample_info())
            .with_payload(ResourceKind::Nodes, sample_nodes())
            .with_payload(ResourceKind::Services, sample_services())
    }

    /// Source whose every fetch fails as if the control socket were missing.
    pub fn unreachable() -> Self {
        let err = SourceError::Connect("/var/run/docker.sock: No such file or directory".to_string());
        let mut responses = HashMap::new();
        for kind in ResourceKind::ALL {
            responses.insert(kind, MockResponse::Error(err.clone()));
        }
        Self {
            responses: RwLock::new(responses),
            ..Self::default()
        }
    }

    pub fn with_payload(mut self, kind: ResourceKind, payload: RawPayload) -> Self {
        self.responses
            .get_mut()
            .insert(kind, MockResponse::Payload(payload));
        self
    }

    pub fn with_error(mut self, kind: ResourceKind, error: SourceError) -> Self {
        self.responses.get_mut().insert(kind, MockResponse::Error(error));
        self
    }

    /// Delay every fetch, e.g. to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the response for `kind` while the source is in use.
    pub async fn set_response(&self, kind: ResourceKind, response: MockResponse) {
        self.responses.write().await.insert(kind, response);
    }

    pub async fn call_count(&self, kind: ResourceKind) -> usize {
        self.calls.read().await.get(&kind).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ClusterSource for MockSource {
    async fn fetch_raw(&self, kind: ResourceKind) -> Result<RawPayload> {
        *self.calls.write().await.entry(kind).or_insert(0) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.responses.read().await.get(&kind) {
            Some(MockResponse::Payload(payload)) => Ok(payload.clone()),
            Some(MockResponse::Error(err)) => Err(err.clone()),
            None => Err(SourceError::Connect(format!(
                "no mock response configured for {}",
                kind
            ))),
        }
    }

    fn describe(&self) -> String {
        "mock source".to_string()
    }
}

pub fn sample_info() -> RawPayload {
    json!({
        "ID": "7TRN:IPZB:QYBB:VPBQ:UWGK:TW2S:DH2Q:LBSM:5ZBG:VTYT:NBGM:ZJAE",
        "Containers": 4,
        "ServerVersion": "24.0.7",
        "Swarm": {
            "NodeID": "abc123",
            "NodeAddr": "10.0.0.1",
            "LocalNodeState": "active",
            "ControlAvailable": true,
            "Error": "",
            "Nodes": 3,
            "Managers": 1
        }
    })
}

pub fn sample_nodes() -> RawPayload {
    json!([
        {
            "ID": "abc123",
            "Spec": {"Role": "manager", "Availability": "active"},
            "Description": {"Hostname": "manager-01"},
            "Status": {"State": "ready", "Addr": "10.0.0.1"},
            "ManagerStatus": {"Leader": true, "Reachability": "reachable"}
        },
        {
            "ID": "def456",
            "Spec": {"Role": "worker", "Availability": "active"},
            "Description": {"Hostname": "worker-01"},
            "Status": {"State": "ready", "Addr": "10.0.0.2"}
        },
        {
            "ID": "ghi789",
            "Spec": {"Role": "worker", "Availability": "drain"},
            "Description": {},
            "Status": {"State": "down"}
        }
    ])
}

pub fn sample_services() -> RawPayload {
    json!([
        {
            "ID": "s1",
            "Spec": {"Name": "web", "Mode": {"Replicated": {"Replicas": 5}}}
        },
        {
            "ID": "s2",
            "Spec": {"Name": "ingress", "Mode": {"Global": {}}}
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_swarm_answers_every_kind() {
        let source = MockSource::sample_swarm();
        for kind in ResourceKind::ALL {
            assert!(source.fetch_raw(kind).await.is_ok());
        }
        assert_eq!(source.call_count(ResourceKind::Nodes).await, 1);
    }

    #[tokio::test]
    async fn test_unconfigured_kind_fails() {
        let source = MockSource::new().with_payload(ResourceKind::Info, json!({}));
        let err = source.fetch_raw(ResourceKind::Services).await.unwrap_err();
        assert!(matches!(err, SourceError::Connect(_)));
    }

    #[tokio::test]
    async fn test_response_can_change() {
        let source = MockSource::sample_swarm();
        source
            .set_response(
                ResourceKind::Info,
                MockResponse::Error(SourceError::Timeout(Duration::from_secs(1))),
            )
            .await;

        assert!(source.fetch_raw(ResourceKind::Info).await.is_err());
        assert_eq!(source.call_count(ResourceKind::Info).await, 1);
        assert_eq!(source.call_count(ResourceKind::Services).await, 0);
    }

    #[tokio::test]
    async fn test_unreachable() {
        let source = MockSource::unreachable();
        for kind in ResourceKind::ALL {
            assert!(matches!(source.fetch_raw(kind).await, Err(SourceError::Connect(_))));
        }
    }
}
