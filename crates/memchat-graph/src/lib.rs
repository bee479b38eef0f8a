// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graph reshaping for the visualizer.
//!
//! Converts the memory service's node and edge records into the element
//! format Cytoscape.js consumes: each record becomes `{"data": {...}}` with
//! the canonical keys first and every original field after them. The
//! transform is pure; nothing is dropped, merged, or reordered.

use memchat_core::{MemchatError, RawGraph};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Label given to nodes that carry neither `label` nor `name`.
pub const DEFAULT_NODE_LABEL: &str = "unknown";

/// Label given to edges that carry no `label`, `name`, or `relationship`.
pub const DEFAULT_EDGE_LABEL: &str = "related_to";

const ID_KEYS: &[&str] = &["id", "uuid"];
const NODE_LABEL_KEYS: &[&str] = &["label", "name"];
const EDGE_LABEL_KEYS: &[&str] = &["label", "name", "relationship"];
const SOURCE_KEYS: &[&str] = &["source", "source_node_uuid"];
const TARGET_KEYS: &[&str] = &["target", "target_node_uuid"];

/// One Cytoscape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphElement {
    pub data: Map<String, Value>,
}

impl GraphElement {
    /// The element's canonical id.
    pub fn id(&self) -> Option<&str> {
        self.data.get("id").and_then(Value::as_str)
    }

    pub fn label(&self) -> Option<&str> {
        self.data.get("label").and_then(Value::as_str)
    }
}

/// A reshaped graph, ready to serialize for the UI or the exporter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<GraphElement>,
    pub edges: Vec<GraphElement>,
}

impl GraphView {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

#[derive(Clone, Copy)]
enum Half {
    Nodes,
    Edges,
}

impl Half {
    fn name(self) -> &'static str {
        match self {
            Half::Nodes => "nodes",
            Half::Edges => "edges",
        }
    }
}

/// Reshape a raw graph into Cytoscape elements.
///
/// Each half may be a JSON array of records, a JSON object keyed by record
/// id (iterated in document order), or `null`. Any record that is not an
/// object or lacks a required field fails the whole call with
/// [`MemchatError::Graph`] naming the record.
pub fn reshape(raw: &RawGraph) -> Result<GraphView, MemchatError> {
    let nodes = records(&raw.nodes, Half::Nodes)?
        .into_iter()
        .enumerate()
        .map(|(index, record)| reshape_node(index, record))
        .collect::<Result<Vec<_>, _>>()?;

    let edges = records(&raw.edges, Half::Edges)?
        .into_iter()
        .enumerate()
        .map(|(index, record)| reshape_edge(index, record))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GraphView { nodes, edges })
}

fn records(value: &Value, half: Half) -> Result<Vec<&Value>, MemchatError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(map) => Ok(map.values().collect()),
        other => Err(MemchatError::Graph(format!(
            "{} must be an array or an object, got {}",
            half.name(),
            type_name(other)
        ))),
    }
}

fn reshape_node(index: usize, record: &Value) -> Result<GraphElement, MemchatError> {
    let fields = as_object(record, Half::Nodes, index)?;

    let mut data = Map::new();
    data.insert("id".into(), required(fields, ID_KEYS, Half::Nodes, index)?);
    data.insert(
        "label".into(),
        label(fields, NODE_LABEL_KEYS, DEFAULT_NODE_LABEL),
    );
    append_original(&mut data, fields);

    Ok(GraphElement { data })
}

fn reshape_edge(index: usize, record: &Value) -> Result<GraphElement, MemchatError> {
    let fields = as_object(record, Half::Edges, index)?;

    let mut data = Map::new();
    data.insert("id".into(), required(fields, ID_KEYS, Half::Edges, index)?);
    data.insert(
        "source".into(),
        required(fields, SOURCE_KEYS, Half::Edges, index)?,
    );
    data.insert(
        "target".into(),
        required(fields, TARGET_KEYS, Half::Edges, index)?,
    );
    data.insert(
        "label".into(),
        label(fields, EDGE_LABEL_KEYS, DEFAULT_EDGE_LABEL),
    );
    append_original(&mut data, fields);

    Ok(GraphElement { data })
}

fn as_object(
    record: &Value,
    half: Half,
    index: usize,
) -> Result<&Map<String, Value>, MemchatError> {
    record.as_object().ok_or_else(|| {
        MemchatError::Graph(format!(
            "{}[{index}] must be an object, got {}",
            half.name(),
            type_name(record)
        ))
    })
}

/// First usable reference among `keys`, rendered as a string.
fn required(
    fields: &Map<String, Value>,
    keys: &[&str],
    half: Half,
    index: usize,
) -> Result<Value, MemchatError> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find_map(as_reference)
        .map(Value::String)
        .ok_or_else(|| {
            MemchatError::Graph(format!(
                "{}[{index}] is missing `{}`",
                half.name(),
                keys[0]
            ))
        })
}

fn as_reference(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First alias that is neither null nor an empty string, else `default`.
fn label(fields: &Map<String, Value>, keys: &[&str], default: &str) -> Value {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| !value.is_null() && value.as_str() != Some(""))
        .cloned()
        .unwrap_or_else(|| Value::String(default.to_string()))
}

/// Canonical keys keep their position and value; every other original field
/// follows in source order.
fn append_original(data: &mut Map<String, Value>, fields: &Map<String, Value>) {
    for (key, value) in fields {
        if !data.contains_key(key) {
            data.insert(key.clone(), value.clone());
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
