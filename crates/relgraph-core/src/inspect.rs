use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::graph::Node;
use crate::NodeStub;

const MISSING: &str = "N/A";

/// What the info panel shows for a picked node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeInfo {
    pub id: String,
    pub label: String,
    pub screen_name: String,
    pub name: String,
    pub city: String,
    pub relations: Vec<NodeStub>,
    pub attributes: Map<String, Value>,
}

impl NodeInfo {
    pub fn from_node(node: &Node) -> Self {
        let field = |key: &str| scalar_text(node.attributes.get(key));
        let id = scalar_text(node.attributes.get("id"));
        Self {
            id: if id == MISSING && !node.id.is_empty() {
                node.id.to_string()
            } else {
                id
            },
            label: if node.label.is_empty() {
                "Unknown".to_string()
            } else {
                node.label.clone()
            },
            screen_name: field("screen_name"),
            name: field("name"),
            city: field("city"),
            relations: node.relations.clone(),
            attributes: node.attributes.clone(),
        }
    }

    pub fn relation_lines(&self) -> Vec<String> {
        self.relations
            .iter()
            .map(|r| format!("- Related to ID: {}, Label: {}", r.id, r.label))
            .collect()
    }
}

impl fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Node Info:")?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Label: {}", self.label)?;
        writeln!(f, "Screen Name: {}", self.screen_name)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "City: {}", self.city)?;
        writeln!(f, "Relations:")?;
        if self.relations.is_empty() {
            write!(f, "No relations available")
        } else {
            write!(f, "{}", self.relation_lines().join("\n"))
        }
    }
}

/// Strings, numbers and bools print as text; anything else (or an empty
/// string) is treated as missing.
pub fn scalar_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => MISSING.to_string(),
    }
}
