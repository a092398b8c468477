//! CLI error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid API URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("engine disconnected: {0}")]
    Disconnected(String),

    #[error("failed to render output: {0}")]
    Output(String),
}

impl CliError {
    pub fn invalid_url(url: &str, message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn output_error(message: impl Into<String>) -> Self {
        Self::Output(message.into())
    }
}
