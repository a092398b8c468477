//! Cluster source implementations for the swarm dashboard.
//!
//! This crate provides implementations of the `ClusterSource` trait:
//! - `EngineSource`: queries the container engine API over its control socket
//!   or TCP (agent role)
//! - `RelaySource`: relays to an upstream dashboard service over HTTP
//!   (gateway role)
//! - `MockSource`: in-memory canned responses (requires `mock-source` feature)
//!
//! Every real source wraps its requests in a [`FetchPolicy`]: a per-attempt
//! timeout and a single retry of transport failures.

pub mod engine;
pub mod policy;
pub mod relay;
mod response;

#[cfg(unix)]
pub mod unix_http;

#[cfg(feature = "mock-source")]
pub mod mock;

// Re-export common types
pub use cluster_source_interface::{ClusterSource, RawPayload, ResourceKind, SourceError};

pub use engine::{EngineConfig, EngineEndpoint, EngineSource, DEFAULT_ENGINE_SOCKET};
pub use policy::FetchPolicy;
pub use relay::{RelayConfig, RelaySource, DEFAULT_RELAY_PREFIX, LEGACY_AGENT_PREFIX};

#[cfg(feature = "mock-source")]
pub use mock::{MockResponse, MockSource};
