use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorCategory {
    User,
    Group,
    Other,
}

impl ColorCategory {
    pub fn from_label(label: &str) -> Self {
        match label {
            "User" => Self::User,
            "Group" => Self::Group,
            _ => Self::Other,
        }
    }

    pub fn rgb(self) -> u32 {
        match self {
            Self::User => 0x00ff00,
            Self::Group => 0x0000ff,
            Self::Other => 0xff0000,
        }
    }

    /// Linear 0..=1 channels, for renderers that want floats.
    pub fn rgb_f32(self) -> [f32; 3] {
        let c = self.rgb();
        [
            ((c >> 16) & 0xff) as f32 / 255.0,
            ((c >> 8) & 0xff) as f32 / 255.0,
            (c & 0xff) as f32 / 255.0,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub label: String,
    pub position: Vec3,
    pub category: ColorCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkView {
    pub from: NodeId,
    pub to: NodeId,
    pub from_pos: Vec3,
    pub to_pos: Vec3,
}

/// Everything a renderer needs, keyed by node id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SceneSnapshot {
    pub nodes: Vec<NodeView>,
    pub links: Vec<LinkView>,
}

impl SceneSnapshot {
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|n| NodeView {
                id: n.id.clone(),
                label: n.label.clone(),
                position: n.position,
                category: n.category(),
            })
            .collect();
        let links = graph
            .resolved_links()
            .map(|(a, b)| LinkView {
                from: a.id.clone(),
                to: b.id.clone(),
                from_pos: a.position,
                to_pos: b.position,
            })
            .collect();
        Self { nodes, links }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodePayload, NodeRecord};

    #[test]
    fn categories_follow_label() {
        assert_eq!(ColorCategory::from_label("User"), ColorCategory::User);
        assert_eq!(ColorCategory::from_label("Group"), ColorCategory::Group);
        assert_eq!(ColorCategory::from_label("user"), ColorCategory::Other);
        assert_eq!(ColorCategory::from_label(""), ColorCategory::Other);
        assert_eq!(ColorCategory::Group.rgb_f32(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn snapshot_carries_link_endpoint_positions() {
        let mut graph = Graph::from_records(vec![NodeRecord::new(NodePayload::new(1u64, "User"))
            .related_to(NodePayload::new(2u64, "Page"))]);
        graph.nodes_mut()[0].position = Vec3::new(1.0, 2.0, 3.0);
        graph.nodes_mut()[1].position = Vec3::new(-1.0, 0.0, 0.5);

        let snap = SceneSnapshot::from_graph(&graph);
        assert_eq!(snap.nodes.len(), 2);
        assert_eq!(snap.nodes[1].category, ColorCategory::Other);
        assert_eq!(snap.links.len(), 1);
        assert_eq!(snap.links[0].from_pos, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(snap.links[0].to_pos, Vec3::new(-1.0, 0.0, 0.5));

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["nodes"][0]["category"], "user");
        assert_eq!(json["links"][0]["from"], "1");
    }
}
