//! HTTP client for the dashboard API.

use std::time::Duration;

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use dashboard_shared_types::{ErrorBody, HealthStatus};

use crate::error::CliError;

pub const HEALTH_PATH: &str = "/api/docker/health";
pub const NODES_PATH: &str = "/api/docker/nodes";
pub const SERVICES_PATH: &str = "/api/docker/services";
pub const LIVENESS_PATH: &str = "/api/health";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(api_url: &str) -> Result<Self, CliError> {
        let parsed = Url::parse(api_url).map_err(|e| CliError::invalid_url(api_url, e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CliError::invalid_url(
                api_url,
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            base_url: api_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, path: &str) -> Result<Response, CliError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);
        Ok(self.http.get(&url).send().await?)
    }

    /// GET `path` and decode a successful JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CliError> {
        let response = self.send(path).await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(CliError::api(status.as_u16(), error_message(&body)));
        }

        serde_json::from_slice(&body).map_err(|e| CliError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Engine health. A disconnected engine comes back as a 500 carrying a
    /// health body, which is returned as-is.
    pub async fn health(&self) -> Result<HealthStatus, CliError> {
        let response = self.send(HEALTH_PATH).await?;
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<HealthStatus>(&body) {
            Ok(health) => Ok(health),
            Err(_) if !status.is_success() => {
                Err(CliError::api(status.as_u16(), error_message(&body)))
            }
            Err(e) => Err(CliError::Decode {
                path: HEALTH_PATH.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(err) => err.error,
        Err(_) => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                "empty response".to_string()
            } else {
                text
            }
        }
    }
}
