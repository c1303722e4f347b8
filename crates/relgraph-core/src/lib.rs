//! Node/relation records, graph construction and the one-shot force layout
//! behind the relgraph viewer.
//!
//! The crate is pure: records go in, a [`Graph`] with positioned nodes comes
//! out. Fetching and rendering live in `relgraph-loader` and
//! `relgraph-viewer`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub mod builder;
pub mod graph;
pub mod inspect;
pub mod layout;
pub mod scene;

pub use builder::{GraphBuilder, RelatedNodes};
pub use glam::Vec3;
pub use graph::{Graph, Link, Node};
pub use inspect::NodeInfo;
pub use layout::{LayoutEngine, LayoutParams, LayoutUpdate};
pub use scene::{ColorCategory, LinkView, NodeView, SceneSnapshot};

/// Node identity. The backend sends ids as strings or numbers; both are kept
/// as their textual form so `1` and `"1"` name the same node.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self(s.trim().to_string()),
            Value::Number(n) => Self(n.to_string()),
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for NodeId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Element of `GET /nodes`, and the id/label reference a node keeps for each
/// of its relations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeStub {
    #[serde(default)]
    pub id: NodeId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: String,
}

impl NodeStub {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Full node body as carried by `GET /node/{label}/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodePayload {
    #[serde(default)]
    pub id: NodeId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_object")]
    pub attributes: Map<String, Value>,
}

impl NodePayload {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn stub(&self) -> NodeStub {
        NodeStub {
            id: self.id.clone(),
            label: self.label.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Relation {
    pub related_node: NodePayload,
}

/// One detail record: the primary node plus the relations it declares.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeRecord {
    #[serde(default, deserialize_with = "lenient_payload")]
    pub node: NodePayload,
    #[serde(default, deserialize_with = "lenient_relations")]
    pub relations: Vec<Relation>,
}

impl NodeRecord {
    pub fn new(node: NodePayload) -> Self {
        Self {
            node,
            relations: Vec::new(),
        }
    }

    pub fn related_to(mut self, related: NodePayload) -> Self {
        self.relations.push(Relation {
            related_node: related,
        });
        self
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_object<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Map<String, Value>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

fn lenient_payload<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NodePayload, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(payload_from_value(value).unwrap_or_default())
}

fn lenient_relations<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Relation>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(mut entry) => entry.remove("related_node"),
            _ => None,
        })
        .filter_map(payload_from_value)
        .map(|related_node| Relation { related_node })
        .collect())
}

fn payload_from_value(value: Value) -> Option<NodePayload> {
    match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_agree() {
        let a: NodeStub = serde_json::from_str(r#"{"id": 1, "label": "User"}"#).unwrap();
        let b: NodeStub = serde_json::from_str(r#"{"id": "1", "label": "User"}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.id.as_str(), "1");
    }

    #[test]
    fn record_decodes_backend_shape() {
        let json = r#"{
            "node": {"id": 1, "label": "User", "attributes": {"name": "Ann", "city": "Oslo"}},
            "relations": [{"related_node": {"id": 2, "label": "Group"}}]
        }"#;
        let rec: NodeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.node.id, NodeId::from(1));
        assert_eq!(rec.node.attributes["city"], "Oslo");
        assert_eq!(rec.relations.len(), 1);
        assert_eq!(rec.relations[0].related_node.label, "Group");
    }

    #[test]
    fn malformed_fields_fall_back_to_placeholders() {
        let json = r#"{
            "node": {"id": 7, "label": null, "attributes": "oops"},
            "relations": [
                {"related_node": {"id": 8}},
                {"unrelated": true},
                {"related_node": 3},
                42
            ]
        }"#;
        let rec: NodeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.node.label, "");
        assert!(rec.node.attributes.is_empty());
        assert_eq!(rec.relations.len(), 1);
        assert_eq!(rec.relations[0].related_node.id.as_str(), "8");
        assert_eq!(rec.relations[0].related_node.label, "");
    }

    #[test]
    fn missing_sections_decode_as_empty() {
        let rec: NodeRecord = serde_json::from_str(r#"{"relations": null}"#).unwrap();
        assert!(rec.node.id.is_empty());
        assert!(rec.relations.is_empty());

        let rec: NodeRecord = serde_json::from_str(r#"{"node": [], "relations": {}}"#).unwrap();
        assert_eq!(rec, NodeRecord::default());
    }
}
