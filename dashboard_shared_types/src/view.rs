//! Dashboard-facing views and their derivation from raw engine payloads.

use serde::{Deserialize, Serialize};

use crate::raw::{RawEngineInfo, RawNode, RawService, RawSwarmInfo};

/// Placeholder for a text field the engine did not report.
pub const UNKNOWN: &str = "unknown";

/// Replica text for services that are not replicated or have no replica count.
pub const REPLICAS_GLOBAL_OR_UNKNOWN: &str = "Global / Unknown";

/// `LocalNodeState` value of a node that is an active swarm member.
pub const SWARM_ACTIVE_STATE: &str = "active";

/// Error text returned by the node list endpoint.
pub const NODES_FETCH_ERROR: &str = "Failed to fetch nodes";

/// Error text returned by the service list endpoint.
pub const SERVICES_FETCH_ERROR: &str = "Failed to fetch services";

const FALLBACK_ERROR: &str = "unknown error";

// ============================================================================
// Response Types
// ============================================================================

/// Connectivity and swarm membership as seen by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub connected: bool,
    #[serde(flatten)]
    pub detail: HealthDetail,
}

/// Either the swarm summary (connected) or the failure cause (disconnected).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HealthDetail {
    Swarm(SwarmSummary),
    Error { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwarmSummary {
    pub swarm_active: bool,
    pub swarm_node_id: Option<String>,
    pub swarm_managers: u64,
    pub swarm_nodes: u64,
}

/// A cluster member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub id: String,
    pub hostname: String,
    pub status: String,
}

/// A deployed service.
///
/// `replicas` is text so that numeric and non-numeric cases share one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub id: String,
    pub name: String,
    pub replicas: String,
}

/// Body of the liveness endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivenessStatus {
    pub status: String,
}

impl LivenessStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Generic error body of the list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

// ============================================================================
// Conversion Helpers
// ============================================================================

/// Treats empty strings the same as absent ones.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn or_unknown(value: Option<String>) -> String {
    present(value).unwrap_or_else(|| UNKNOWN.to_string())
}

impl HealthStatus {
    /// Health of a reachable engine.
    pub fn from_info(info: &RawEngineInfo) -> Self {
        let summary = match &info.swarm {
            Some(swarm) => SwarmSummary::from(swarm),
            None => SwarmSummary::from(&RawSwarmInfo::default()),
        };

        Self {
            connected: true,
            detail: HealthDetail::Swarm(summary),
        }
    }

    /// Health of an engine (or upstream) that could not be queried.
    pub fn disconnected(message: impl Into<String>) -> Self {
        let mut error = message.into();
        if error.trim().is_empty() {
            error = FALLBACK_ERROR.to_string();
        }

        Self {
            connected: false,
            detail: HealthDetail::Error { error },
        }
    }

    pub fn swarm(&self) -> Option<&SwarmSummary> {
        match &self.detail {
            HealthDetail::Swarm(summary) => Some(summary),
            HealthDetail::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.detail {
            HealthDetail::Error { error } => Some(error),
            HealthDetail::Swarm(_) => None,
        }
    }
}

impl From<&RawSwarmInfo> for SwarmSummary {
    fn from(swarm: &RawSwarmInfo) -> Self {
        SwarmSummary {
            swarm_active: swarm.local_node_state.as_deref() == Some(SWARM_ACTIVE_STATE),
            swarm_node_id: present(swarm.node_id.clone()),
            swarm_managers: swarm.managers.unwrap_or(0),
            swarm_nodes: swarm.nodes.unwrap_or(0),
        }
    }
}

impl From<RawNode> for NodeInfo {
    fn from(node: RawNode) -> Self {
        NodeInfo {
            id: node.id,
            hostname: or_unknown(node.description.and_then(|d| d.hostname)),
            status: or_unknown(node.status.and_then(|s| s.state)),
        }
    }
}

impl From<RawService> for ServiceInfo {
    fn from(service: RawService) -> Self {
        let (name, mode) = match service.spec {
            Some(spec) => (spec.name, spec.mode),
            None => (None, None),
        };

        let replicas = mode
            .and_then(|m| m.replicated)
            .and_then(|r| r.replicas)
            .map(|count| count.to_string())
            .unwrap_or_else(|| REPLICAS_GLOBAL_OR_UNKNOWN.to_string());

        ServiceInfo {
            id: service.id,
            name: or_unknown(name),
            replicas,
        }
    }
}

/// Normalizes a node list, keeping the engine's order.
pub fn normalize_nodes(nodes: Vec<RawNode>) -> Vec<NodeInfo> {
    nodes.into_iter().map(Into::into).collect()
}

/// Normalizes a service list, keeping the engine's order.
pub fn normalize_services(services: Vec<RawService>) -> Vec<ServiceInfo> {
    services.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> NodeInfo {
        serde_json::from_value::<RawNode>(value).unwrap().into()
    }

    fn service(value: serde_json::Value) -> ServiceInfo {
        serde_json::from_value::<RawService>(value).unwrap().into()
    }

    #[test]
    fn test_health_active_swarm() {
        let info: RawEngineInfo = serde_json::from_value(json!({
            "Swarm": {
                "LocalNodeState": "active",
                "NodeID": "abc123",
                "Managers": 1,
                "Nodes": 3
            }
        }))
        .unwrap();

        let health = HealthStatus::from_info(&info);
        assert_eq!(
            serde_json::to_value(&health).unwrap(),
            json!({
                "connected": true,
                "swarmActive": true,
                "swarmNodeId": "abc123",
                "swarmManagers": 1,
                "swarmNodes": 3
            })
        );
        assert!(health.error().is_none());
    }

    #[test]
    fn test_health_inactive_swarm_defaults() {
        let info: RawEngineInfo = serde_json::from_value(json!({
            "Swarm": {"LocalNodeState": "inactive", "NodeID": ""}
        }))
        .unwrap();

        let health = HealthStatus::from_info(&info);
        assert_eq!(
            serde_json::to_value(&health).unwrap(),
            json!({
                "connected": true,
                "swarmActive": false,
                "swarmNodeId": null,
                "swarmManagers": 0,
                "swarmNodes": 0
            })
        );
    }

    #[test]
    fn test_health_state_match_is_exact() {
        let info: RawEngineInfo = serde_json::from_value(json!({
            "Swarm": {"LocalNodeState": "Active"}
        }))
        .unwrap();

        assert!(!HealthStatus::from_info(&info).swarm().unwrap().swarm_active);
    }

    #[test]
    fn test_health_without_swarm_section() {
        let health = HealthStatus::from_info(&RawEngineInfo::default());
        let summary = health.swarm().unwrap();
        assert!(health.connected);
        assert!(!summary.swarm_active);
        assert_eq!(summary.swarm_node_id, None);
        assert_eq!(summary.swarm_managers, 0);
        assert_eq!(summary.swarm_nodes, 0);
    }

    #[test]
    fn test_health_disconnected_has_no_swarm_fields() {
        let health = HealthStatus::disconnected("connect ENOENT /var/run/docker.sock");
        assert_eq!(
            serde_json::to_value(&health).unwrap(),
            json!({
                "connected": false,
                "error": "connect ENOENT /var/run/docker.sock"
            })
        );
    }

    #[test]
    fn test_health_disconnected_never_empty() {
        let health = HealthStatus::disconnected("  ");
        assert_eq!(health.error(), Some(FALLBACK_ERROR));
    }

    #[test]
    fn test_health_deserializes_both_forms() {
        let ok: HealthStatus = serde_json::from_value(json!({
            "connected": true,
            "swarmActive": true,
            "swarmNodeId": null,
            "swarmManagers": 2,
            "swarmNodes": 5
        }))
        .unwrap();
        assert_eq!(ok.swarm().unwrap().swarm_nodes, 5);

        let failed: HealthStatus =
            serde_json::from_value(json!({"connected": false, "error": "boom"})).unwrap();
        assert_eq!(failed.error(), Some("boom"));
        assert!(!failed.connected);
    }

    #[test]
    fn test_node_missing_fields_default_to_unknown() {
        assert_eq!(
            node(json!({"ID": "n1", "Description": {}, "Status": {}})),
            NodeInfo {
                id: "n1".to_string(),
                hostname: "unknown".to_string(),
                status: "unknown".to_string(),
            }
        );
        assert_eq!(node(json!({"ID": "n2"})).hostname, UNKNOWN);
        assert_eq!(
            node(json!({"ID": "n3", "Description": {"Hostname": ""}})).hostname,
            UNKNOWN
        );
    }

    #[test]
    fn test_node_present_fields_verbatim() {
        let info = node(json!({
            "ID": "n1",
            "Description": {"Hostname": "manager-01"},
            "Status": {"State": "ready", "Addr": "10.0.0.1"},
            "Spec": {"Role": "manager"}
        }));
        assert_eq!(info.hostname, "manager-01");
        assert_eq!(info.status, "ready");
    }

    #[test]
    fn test_service_replicated() {
        assert_eq!(
            service(json!({"ID": "s1", "Spec": {"Name": "web", "Mode": {"Replicated": {"Replicas": 5}}}})),
            ServiceInfo {
                id: "s1".to_string(),
                name: "web".to_string(),
                replicas: "5".to_string(),
            }
        );
        assert_eq!(
            service(json!({"ID": "s0", "Spec": {"Mode": {"Replicated": {"Replicas": 0}}}})).replicas,
            "0"
        );
    }

    #[test]
    fn test_service_without_replica_count() {
        let cases = [
            json!({"ID": "s2", "Spec": {"Name": "ingress", "Mode": {"Global": {}}}}),
            json!({"ID": "s3", "Spec": {"Name": "db"}}),
            json!({"ID": "s4", "Spec": {"Name": "db", "Mode": {"Replicated": {}}}}),
            json!({"ID": "s5", "Spec": {"Name": "db", "Mode": {"Replicated": {"Replicas": null}}}}),
            json!({"ID": "s6"}),
        ];

        for case in cases {
            assert_eq!(service(case).replicas, REPLICAS_GLOBAL_OR_UNKNOWN);
        }
    }

    #[test]
    fn test_service_missing_name() {
        assert_eq!(service(json!({"ID": "s7", "Spec": {}})).name, UNKNOWN);
    }

    #[test]
    fn test_normalize_preserves_order_and_length() {
        let raw: Vec<RawNode> = serde_json::from_value(json!([
            {"ID": "c", "Description": {"Hostname": "gamma"}},
            {"ID": "a"},
            {"ID": "b", "Status": {"State": "down"}}
        ]))
        .unwrap();

        let ids: Vec<String> = normalize_nodes(raw).into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);

        assert!(normalize_services(Vec::new()).is_empty());
    }

    #[test]
    fn test_liveness_body() {
        assert_eq!(
            serde_json::to_value(LivenessStatus::ok()).unwrap(),
            json!({"status": "ok"})
        );
    }
}
