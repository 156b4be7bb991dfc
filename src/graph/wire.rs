use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GraphError, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRequest {
    pub user_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEdge {
    pub source: String,
    pub target: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphResponse {
    pub nodes: Vec<WireNode>,
    pub edges: Vec<WireEdge>,
}

impl GraphResponse {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

pub fn decode_response_str(raw: &str) -> Result<GraphResponse> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|error| GraphError::MalformedResponse(format!("invalid JSON: {error}")))?;
    decode_response(&value)
}

/// Best-effort decoding: entries missing required fields are skipped with a
/// warning. Only a payload without `nodes`/`edges` arrays is rejected.
pub fn decode_response(value: &Value) -> Result<GraphResponse> {
    let object = value
        .as_object()
        .ok_or_else(|| GraphError::MalformedResponse("payload is not an object".to_owned()))?;
    let raw_nodes = object
        .get("nodes")
        .and_then(Value::as_array)
        .ok_or_else(|| GraphError::MalformedResponse("missing `nodes` array".to_owned()))?;
    let raw_edges = object
        .get("edges")
        .and_then(Value::as_array)
        .ok_or_else(|| GraphError::MalformedResponse("missing `edges` array".to_owned()))?;

    let nodes = raw_nodes
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let node = decode_node(entry);
            if node.is_none() {
                log::warn!("skipping malformed node #{index}: {entry}");
            }
            node
        })
        .collect::<Vec<_>>();

    let edges = raw_edges
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let edge = decode_edge(entry);
            if edge.is_none() {
                log::warn!("skipping malformed edge #{index}: {entry}");
            }
            edge
        })
        .collect::<Vec<_>>();

    Ok(GraphResponse { nodes, edges })
}

fn non_empty_str<'a>(entry: &'a Value, key: &str) -> Option<&'a str> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn finite_coord(entry: &Value, key: &str) -> Option<f32> {
    entry
        .get(key)
        .and_then(Value::as_f64)
        .map(|value| value as f32)
        .filter(|value| value.is_finite())
}

fn decode_node(entry: &Value) -> Option<WireNode> {
    Some(WireNode {
        id: non_empty_str(entry, "id")?.to_owned(),
        x: finite_coord(entry, "x")?,
        y: finite_coord(entry, "y")?,
    })
}

fn decode_edge(entry: &Value) -> Option<WireEdge> {
    Some(WireEdge {
        source: non_empty_str(entry, "source")?.to_owned(),
        target: non_empty_str(entry, "target")?.to_owned(),
    })
}
