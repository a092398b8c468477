//! API errors and their HTTP representation.

use std::net::SocketAddr;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use dashboard_shared_types::{ErrorBody, HealthStatus, NODES_FETCH_ERROR, SERVICES_FETCH_ERROR};

/// Failures surfaced by the dashboard endpoints.
///
/// Only the health endpoint reports the underlying cause; the list endpoints
/// answer with a fixed message and the cause goes to the log.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("engine unavailable: {0}")]
    Health(String),

    #[error("{}", NODES_FETCH_ERROR)]
    Nodes,

    #[error("{}", SERVICES_FETCH_ERROR)]
    Services,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Health(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthStatus::disconnected(message)),
            )
                .into_response(),
            ApiError::Nodes => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(NODES_FETCH_ERROR)),
            )
                .into_response(),
            ApiError::Services => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(SERVICES_FETCH_ERROR)),
            )
                .into_response(),
        }
    }
}

/// Failures while assembling or running the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid CORS origin '{0}'")]
    InvalidOrigin(String),

    #[error("gateway requires an upstream URL (--upstream-url or DOCKER_SOCKET_AGENT_URL)")]
    MissingUpstream,

    #[error("failed to create cluster source: {0}")]
    Source(#[from] cluster_source_interface::SourceError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error on {addr}: {source}")]
    Serve {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_error_response() {
        let response = ApiError::Health("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"connected": false, "error": "connection refused"})
        );
    }

    #[tokio::test]
    async fn test_list_error_responses_are_generic() {
        let response = ApiError::Nodes.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Failed to fetch nodes"})
        );

        let response = ApiError::Services.into_response();
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Failed to fetch services"})
        );
    }
}
