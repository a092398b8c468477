//! Request and fetch metrics.
//!
//! Recorded through the `metrics` facade; nothing is collected unless a
//! recorder is installed, e.g. with [`install_prometheus_exporter`].

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;

pub const REQUESTS_TOTAL: &str = "dashboard_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "dashboard_request_duration_seconds";
pub const SOURCE_FAILURES_TOTAL: &str = "dashboard_source_failures_total";

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("failed to install Prometheus exporter on {addr}: {message}")]
    Install { addr: SocketAddr, message: String },
}

/// Metric handles for one dashboard service instance.
#[derive(Debug, Clone)]
pub struct DashboardMetrics {
    role: &'static str,
}

impl DashboardMetrics {
    /// `role` labels every metric (`agent` or `gateway`).
    pub fn new(role: &'static str) -> Self {
        Self { role }
    }

    pub fn role(&self) -> &'static str {
        self.role
    }

    /// Register metric descriptions with the installed recorder.
    pub fn describe(&self) {
        describe_counter!(REQUESTS_TOTAL, "Dashboard API requests by endpoint and status");
        describe_histogram!(
            REQUEST_DURATION_SECONDS,
            Unit::Seconds,
            "Dashboard API request latency"
        );
        describe_counter!(
            SOURCE_FAILURES_TOTAL,
            "Failed fetches from the engine or upstream by resource and cause"
        );
    }

    /// `endpoint` is the matched route, e.g. `/api/docker/nodes`.
    pub fn record_request(&self, endpoint: &str, status: u16, elapsed: Duration) {
        counter!(
            REQUESTS_TOTAL,
            "role" => self.role,
            "endpoint" => endpoint.to_string(),
            "status" => status.to_string()
        )
        .increment(1);
        histogram!(
            REQUEST_DURATION_SECONDS,
            "role" => self.role,
            "endpoint" => endpoint.to_string()
        )
        .record(elapsed.as_secs_f64());
    }

    pub fn record_fetch_failure(&self, resource: &'static str, cause: &'static str) {
        counter!(
            SOURCE_FAILURES_TOTAL,
            "role" => self.role,
            "resource" => resource,
            "cause" => cause
        )
        .increment(1);
    }
}

/// Install a global Prometheus recorder serving `/metrics` on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn install_prometheus_exporter(addr: SocketAddr) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| MetricsError::Install {
            addr,
            message: e.to_string(),
        })
}
