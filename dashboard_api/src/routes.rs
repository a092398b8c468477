//! Route table and HTTP layers.

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::error::StartupError;
use crate::handlers;
use crate::state::{ApiState, Role};

/// Dashboard endpoints, without layers or state.
pub fn api_routes() -> Router<ApiState> {
    Router::new()
        .route("/api/docker/health", get(handlers::docker_health))
        .route("/api/docker/nodes", get(handlers::list_nodes))
        .route("/api/docker/services", get(handlers::list_services))
        .route("/api/docker/raw/health", get(handlers::raw_info))
        .route("/api/docker/raw/nodes", get(handlers::raw_nodes))
        .route("/api/docker/raw/services", get(handlers::raw_services))
        .route("/api/health", get(handlers::liveness))
}

/// CORS policy for `role`.
///
/// Agents accept any origin. Gateways accept `origin` when configured and
/// fall back to any origin otherwise.
pub fn cors_layer(role: Role, origin: Option<&str>) -> Result<CorsLayer, StartupError> {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    match (role, origin.map(str::trim).filter(|o| !o.is_empty())) {
        (Role::Gateway, Some(origin)) => {
            let value = HeaderValue::from_str(origin.trim_end_matches('/'))
                .map_err(|_| StartupError::InvalidOrigin(origin.to_string()))?;
            Ok(base.allow_origin(AllowOrigin::list([value])))
        }
        (Role::Gateway, None) => {
            warn!("No frontend origin configured; allowing cross-origin requests from any origin");
            Ok(base.allow_origin(Any))
        }
        (Role::Agent, _) => Ok(base.allow_origin(Any)),
    }
}

/// Full application router.
pub fn create_router(state: ApiState, cors: CorsLayer) -> Router {
    api_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::track_metrics,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
