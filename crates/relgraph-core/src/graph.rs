use glam::Vec3;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::scene::ColorCategory;
use crate::{NodeId, NodePayload, NodeStub};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub attributes: Map<String, Value>,
    /// Relations as declared by this node's own record, in wire order.
    pub relations: Vec<NodeStub>,
    pub position: Vec3,
    /// Created from a relation reference only; no primary record seen yet.
    pub stub: bool,
}

impl Node {
    pub(crate) fn primary(payload: NodePayload, relations: Vec<NodeStub>) -> Self {
        Self {
            id: payload.id,
            label: payload.label,
            attributes: payload.attributes,
            relations,
            position: Vec3::ZERO,
            stub: false,
        }
    }

    pub(crate) fn stub(payload: NodePayload) -> Self {
        Self {
            id: payload.id,
            label: payload.label,
            attributes: payload.attributes,
            relations: Vec::new(),
            position: Vec3::ZERO,
            stub: true,
        }
    }

    pub(crate) fn upgrade(&mut self, payload: NodePayload, relations: Vec<NodeStub>) {
        if !payload.label.is_empty() {
            self.label = payload.label;
        }
        self.attributes = payload.attributes;
        self.relations = relations;
        self.stub = false;
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    pub fn category(&self) -> ColorCategory {
        ColorCategory::from_label(&self.label)
    }
}

/// Undirected edge derived from a relation. `from` is the node whose record
/// declared the relation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct Link {
    pub from: NodeId,
    pub to: NodeId,
}

impl Link {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }

    pub fn touches(&self, id: &NodeId) -> bool {
        &self.from == id || &self.to == id
    }

    /// Same endpoints regardless of direction.
    pub fn connects(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
    }
}

/// Nodes in first-seen order plus the links between them. Every link in
/// [`Graph::links`] resolves to two nodes of the same graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    links: Vec<Link>,
}

impl Graph {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = crate::NodeRecord>,
    {
        let mut builder = crate::GraphBuilder::new();
        builder.extend(records);
        builder.finish()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        let i = self.index_of(id)?;
        Some(&mut self.nodes[i])
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn links_of<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.iter().filter(move |l| l.touches(id))
    }

    pub fn resolved_links(&self) -> impl Iterator<Item = (&Node, &Node)> + '_ {
        self.links
            .iter()
            .filter_map(|l| Some((self.node(&l.from)?, self.node(&l.to)?)))
    }

    pub(crate) fn insert(&mut self, node: Node) -> usize {
        let i = self.nodes.len();
        self.index.insert(node.id.clone(), i);
        self.nodes.push(node);
        i
    }

    pub(crate) fn node_at_mut(&mut self, i: usize) -> &mut Node {
        &mut self.nodes[i]
    }

    pub(crate) fn push_link(&mut self, link: Link) {
        self.links.push(link);
    }
}
