//! Turning HTTP responses from the engine or an upstream into payloads.

use std::error::Error;

use cluster_source_interface::{RawPayload, Result, SourceError};

const MAX_MESSAGE_LEN: usize = 512;

/// Decode a successful body, or convert an error status into [`SourceError::Status`].
pub(crate) fn into_payload(status: u16, body: &[u8]) -> Result<RawPayload> {
    if !(200..300).contains(&status) {
        return Err(SourceError::status(status, error_message(status, body)));
    }

    serde_json::from_slice(body).map_err(|e| SourceError::Decode(e.to_string()))
}

/// Best human-readable cause carried by an error body.
///
/// The engine reports `{"message": ...}`, dashboard services report
/// `{"error": ...}`; anything else falls back to the raw text.
pub(crate) fn error_message(status: u16, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for field in ["error", "message"] {
            if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return format!("request failed with status {}", status);
    }

    let mut message: String = text.chars().take(MAX_MESSAGE_LEN).collect();
    if message.len() < text.len() {
        message.push_str("...");
    }
    message
}

/// Flatten an error and its sources into one line.
pub(crate) fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Map a reqwest failure onto the transport taxonomy.
pub(crate) fn from_reqwest(err: reqwest::Error) -> SourceError {
    let message = error_chain(&err);
    if err.is_connect() {
        SourceError::Connect(message)
    } else if err.is_decode() || err.is_body() {
        SourceError::Protocol(message)
    } else if err.is_builder() {
        SourceError::Unsupported(message)
    } else {
        SourceError::Connect(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body_decodes() {
        let payload = into_payload(200, br#"[{"ID":"n1"}]"#).unwrap();
        assert_eq!(payload[0]["ID"], "n1");
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        assert!(matches!(into_payload(200, b"<html>"), Err(SourceError::Decode(_))));
    }

    #[test]
    fn test_engine_error_message() {
        let err = into_payload(
            503,
            br#"{"message":"This node is not a swarm manager."}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SourceError::status(503, "This node is not a swarm manager.")
        );
    }

    #[test]
    fn test_dashboard_error_message() {
        assert_eq!(
            error_message(500, br#"{"connected":false,"error":"connect ENOENT"}"#),
            "connect ENOENT"
        );
    }

    #[test]
    fn test_plain_and_empty_bodies() {
        assert_eq!(error_message(502, b"  Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message(500, b""), "request failed with status 500");
    }
}
