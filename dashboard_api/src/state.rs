//! API server state.

use std::fmt;
use std::sync::Arc;

use cluster_source_interface::ClusterSource;
use observability::DashboardMetrics;
use user_config::{DEFAULT_AGENT_PORT, DEFAULT_GATEWAY_PORT};

/// Which side of the agent/gateway pair this process plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Colocated with the engine; reads its control socket.
    Agent,
    /// Remote; relays to an upstream agent over HTTP.
    Gateway,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Agent => "agent",
            Role::Gateway => "gateway",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Role::Agent => DEFAULT_AGENT_PORT,
            Role::Gateway => DEFAULT_GATEWAY_PORT,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared state for the API server.
#[derive(Clone)]
pub struct ApiState {
    /// Where raw cluster state comes from.
    pub source: Arc<dyn ClusterSource>,
    /// Request and fetch metrics.
    pub metrics: DashboardMetrics,
    pub role: Role,
}

impl ApiState {
    /// Create new API state.
    pub fn new(role: Role, source: Arc<dyn ClusterSource>) -> Self {
        Self {
            source,
            metrics: DashboardMetrics::new(role.as_str()),
            role,
        }
    }
}
