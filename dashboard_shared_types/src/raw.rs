//! Raw payloads as reported by the container engine API.
//!
//! Only the fields the dashboard reads are modelled. Everything else in the
//! engine's response is ignored. Apart from the entity `ID`, a field that is
//! missing or of the wrong JSON type decodes as `None`, so partial, older or
//! malformed engine responses still decode.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Response of the engine's system info endpoint (`GET /info`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEngineInfo {
    #[serde(rename = "Swarm", default, deserialize_with = "lenient_object")]
    pub swarm: Option<RawSwarmInfo>,
}

impl RawEngineInfo {
    /// Decode an info payload. A payload that is not a JSON object carries no
    /// swarm section.
    pub fn from_payload(payload: Value) -> Self {
        lenient_value(payload).unwrap_or_default()
    }
}

/// Swarm section of the system info response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSwarmInfo {
    #[serde(rename = "LocalNodeState", default, deserialize_with = "lenient_string")]
    pub local_node_state: Option<String>,
    #[serde(rename = "NodeID", default, deserialize_with = "lenient_string")]
    pub node_id: Option<String>,
    #[serde(rename = "Managers", default, deserialize_with = "lenient_count")]
    pub managers: Option<u64>,
    #[serde(rename = "Nodes", default, deserialize_with = "lenient_count")]
    pub nodes: Option<u64>,
}

/// One entry of the engine's node list (`GET /nodes`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Description", default, deserialize_with = "lenient_object")]
    pub description: Option<RawNodeDescription>,
    #[serde(rename = "Status", default, deserialize_with = "lenient_object")]
    pub status: Option<RawNodeStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNodeDescription {
    #[serde(rename = "Hostname", default, deserialize_with = "lenient_string")]
    pub hostname: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNodeStatus {
    #[serde(rename = "State", default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
}

/// One entry of the engine's service list (`GET /services`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawService {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Spec", default, deserialize_with = "lenient_object")]
    pub spec: Option<RawServiceSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawServiceSpec {
    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "Mode", default, deserialize_with = "lenient_object")]
    pub mode: Option<RawServiceMode>,
}

/// Scheduling mode of a service. The engine sets exactly one of the two.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawServiceMode {
    #[serde(rename = "Replicated", default, deserialize_with = "lenient_object")]
    pub replicated: Option<RawReplicatedMode>,
    #[serde(rename = "Global", default)]
    pub global: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReplicatedMode {
    #[serde(
        rename = "Replicas",
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub replicas: Option<u64>,
}

/// Accepts any JSON value and keeps it only if it is a non-negative integer.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_u64()))
}

/// Accepts any JSON value and keeps it only if it is a string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Accepts any JSON value and keeps it only if it is an object that decodes
/// as `T`.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(lenient_value))
}

fn lenient_value<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_object() {
        serde_json::from_value(value).ok()
    } else {
        None
    }
}
