//! Observability stack for the swarm dashboard services.
//!
//! - **Tracing**: structured logging, plain or JSON, filtered by `RUST_LOG`
//! - **Metrics**: per-endpoint request counters and latencies, plus source
//!   failure counters, optionally exported for Prometheus

pub mod metrics;
pub mod tracing_setup;

pub use metrics::{install_prometheus_exporter, DashboardMetrics, MetricsError};
pub use tracing_setup::{init_tracing, TracingConfig, TracingError};

/// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, trace, warn, span, Level};
