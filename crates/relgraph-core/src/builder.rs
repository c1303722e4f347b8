use serde::{Deserialize, Serialize};

use crate::graph::{Graph, Link, Node};
use crate::{NodeId, NodeRecord, NodeStub, Relation};

/// What to do with relation targets that have not (yet) been seen as a
/// primary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedNodes {
    /// Create a stub node from the relation's id/label.
    #[default]
    Materialize,
    /// Only primary records become nodes; links to ids that never show up
    /// as a primary record are dropped.
    PrimaryOnly,
}

/// Deduplicates records into a [`Graph`]. Links are resolved in
/// [`GraphBuilder::finish`], so a relation may point at a record pushed later.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: Graph,
    policy: RelatedNodes,
    pending: Vec<Link>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RelatedNodes) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> RelatedNodes {
        self.policy
    }

    pub fn push(&mut self, record: NodeRecord) {
        let NodeRecord { node, relations } = record;
        if node.id.is_empty() {
            tracing::warn!(label = %node.label, "skipping record without node id");
            return;
        }
        let primary = node.id.clone();

        let mut related = Vec::with_capacity(relations.len());
        for Relation { related_node } in relations {
            if related_node.id.is_empty() {
                tracing::warn!(from = %primary, "skipping relation without related node id");
                continue;
            }
            related.push(related_node);
        }
        let refs: Vec<NodeStub> = related.iter().map(|p| p.stub()).collect();

        // first primary payload wins; relations still link from every record
        match self.graph.index_of(&primary) {
            Some(i) if !self.graph.nodes()[i].stub => {
                tracing::debug!(id = %primary, "keeping first payload of repeated record");
            }
            Some(i) => self.graph.node_at_mut(i).upgrade(node, refs),
            None => {
                self.graph.insert(Node::primary(node, refs));
            }
        }

        for payload in related {
            let to = payload.id.clone();
            if self.policy == RelatedNodes::Materialize && !self.graph.contains(&to) {
                self.graph.insert(Node::stub(payload));
            }
            self.pending.push(Link::new(primary.clone(), to));
        }
    }

    pub fn extend<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = NodeRecord>,
    {
        for record in records {
            self.push(record);
        }
    }

    pub fn finish(self) -> Graph {
        let Self {
            mut graph, pending, ..
        } = self;
        let mut skipped = 0usize;
        for link in pending {
            match missing_endpoint(&graph, &link) {
                None => graph.push_link(link),
                Some(missing) => {
                    skipped += 1;
                    tracing::warn!(
                        from = %link.from,
                        to = %link.to,
                        %missing,
                        "cannot create link: endpoint node is missing"
                    );
                }
            }
        }
        tracing::debug!(
            nodes = graph.len(),
            links = graph.links().len(),
            skipped,
            "graph built"
        );
        graph
    }
}

fn missing_endpoint<'a>(graph: &Graph, link: &'a Link) -> Option<&'a NodeId> {
    [&link.from, &link.to]
        .into_iter()
        .find(|id| !graph.contains(id))
}
