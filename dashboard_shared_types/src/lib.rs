//! Shared types for the swarm dashboard services.
//!
//! - [`raw`]: the container engine's payloads, decoded leniently
//! - [`view`]: the stable shapes served to the dashboard, and the pure
//!   mapping from the former to the latter

pub mod raw;
pub mod view;

pub use raw::{
    RawEngineInfo, RawNode, RawNodeDescription, RawNodeStatus, RawReplicatedMode, RawService,
    RawServiceMode, RawServiceSpec, RawSwarmInfo,
};
pub use view::{
    normalize_nodes, normalize_services, ErrorBody, HealthDetail, HealthStatus, LivenessStatus,
    NodeInfo, ServiceInfo, SwarmSummary, NODES_FETCH_ERROR, REPLICAS_GLOBAL_OR_UNKNOWN,
    SERVICES_FETCH_ERROR, SWARM_ACTIVE_STATE, UNKNOWN,
};
