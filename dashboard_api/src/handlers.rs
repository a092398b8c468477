//! API request handlers.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use cluster_source_interface::{RawPayload, ResourceKind, SourceError};
use dashboard_shared_types::{
    normalize_nodes, normalize_services, HealthStatus, LivenessStatus, NodeInfo, RawEngineInfo,
    RawNode, RawService, ServiceInfo,
};

use crate::error::{ApiError, ApiResult};
use crate::state::ApiState;

// ============================================================================
// Source Access
// ============================================================================

/// Fetch `kind` from the configured source, logging and counting failures.
async fn fetch(state: &ApiState, kind: ResourceKind) -> Result<RawPayload, SourceError> {
    match state.source.fetch_raw(kind).await {
        Ok(payload) => {
            debug!("Fetched {} from {}", kind, state.source.describe());
            Ok(payload)
        }
        Err(e) => {
            error!("Error fetching {} from {}: {}", kind, state.source.describe(), e);
            state.metrics.record_fetch_failure(kind.as_str(), e.label());
            Err(e)
        }
    }
}

/// Fetch a list `kind` and decode it into its raw engine entries.
async fn fetch_decoded<T: DeserializeOwned>(
    state: &ApiState,
    kind: ResourceKind,
) -> Result<T, SourceError> {
    let payload = fetch(state, kind).await?;
    serde_json::from_value(payload).map_err(|e| {
        let err = SourceError::Decode(e.to_string());
        error!("Unexpected {} payload from {}: {}", kind, state.source.describe(), err);
        state.metrics.record_fetch_failure(kind.as_str(), err.label());
        err
    })
}

/// Fetch a list payload without interpreting its entries.
async fn fetch_list(state: &ApiState, kind: ResourceKind) -> Result<RawPayload, SourceError> {
    let payload = fetch(state, kind).await?;
    if payload.is_array() {
        Ok(payload)
    } else {
        let err = SourceError::Decode(format!("expected a JSON array of {}", kind));
        error!("Unexpected {} payload from {}: {}", kind, state.source.describe(), err);
        state.metrics.record_fetch_failure(kind.as_str(), err.label());
        Err(err)
    }
}

// ============================================================================
// Dashboard Handlers
// ============================================================================

/// Engine connectivity and swarm membership.
pub async fn docker_health(State(state): State<ApiState>) -> ApiResult<Json<HealthStatus>> {
    let payload = fetch(&state, ResourceKind::Info)
        .await
        .map_err(|e| ApiError::Health(e.to_string()))?;

    Ok(Json(HealthStatus::from_info(&RawEngineInfo::from_payload(payload))))
}

/// List swarm nodes.
pub async fn list_nodes(State(state): State<ApiState>) -> ApiResult<Json<Vec<NodeInfo>>> {
    let nodes: Vec<RawNode> = fetch_decoded(&state, ResourceKind::Nodes)
        .await
        .map_err(|_| ApiError::Nodes)?;

    Ok(Json(normalize_nodes(nodes)))
}

/// List swarm services.
pub async fn list_services(State(state): State<ApiState>) -> ApiResult<Json<Vec<ServiceInfo>>> {
    let services: Vec<RawService> = fetch_decoded(&state, ResourceKind::Services)
        .await
        .map_err(|_| ApiError::Services)?;

    Ok(Json(normalize_services(services)))
}

/// Liveness endpoint. Never touches the source.
pub async fn liveness() -> Json<LivenessStatus> {
    Json(LivenessStatus::ok())
}

// ============================================================================
// Raw Passthrough Handlers
// ============================================================================

/// Engine info exactly as the source reported it.
pub async fn raw_info(State(state): State<ApiState>) -> ApiResult<Json<RawPayload>> {
    let payload = fetch(&state, ResourceKind::Info)
        .await
        .map_err(|e| ApiError::Health(e.to_string()))?;
    Ok(Json(payload))
}

/// Node list exactly as the source reported it.
pub async fn raw_nodes(State(state): State<ApiState>) -> ApiResult<Json<RawPayload>> {
    let payload = fetch_list(&state, ResourceKind::Nodes)
        .await
        .map_err(|_| ApiError::Nodes)?;
    Ok(Json(payload))
}

/// Service list exactly as the source reported it.
pub async fn raw_services(State(state): State<ApiState>) -> ApiResult<Json<RawPayload>> {
    let payload = fetch_list(&state, ResourceKind::Services)
        .await
        .map_err(|_| ApiError::Services)?;
    Ok(Json(payload))
}

// ============================================================================
// Middleware
// ============================================================================

/// Record count and latency of every routed request.
pub async fn track_metrics(
    State(state): State<ApiState>,
    matched: Option<MatchedPath>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let endpoint = matched
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;
    state
        .metrics
        .record_request(&endpoint, response.status().as_u16(), start.elapsed());
    response
}
