use anyhow::{Context, Result};
use futures_util::{stream, StreamExt, TryStreamExt};
use relgraph_core::{NodeRecord, NodeStub};

use crate::source::NodeSource;

/// List all nodes, then fetch their detail records with at most
/// `concurrency` requests in flight. Records come back in listing order.
///
/// The first failed fetch aborts the whole load; no partial result is
/// returned.
pub async fn fetch_records<S>(source: &S, concurrency: usize) -> Result<Vec<NodeRecord>>
where
    S: NodeSource + ?Sized,
{
    let listed = source.list_nodes().await.context("list nodes")?;
    let total = listed.len();
    let stubs: Vec<NodeStub> = listed.into_iter().filter(|s| !s.id.is_empty()).collect();
    if stubs.len() < total {
        tracing::warn!(
            skipped = total - stubs.len(),
            "listing entries without id will not be fetched"
        );
    }

    let limit = concurrency.max(1);
    tracing::debug!(nodes = stubs.len(), limit, "fetching node records");

    stream::iter(stubs.iter())
        .map(|stub| async move {
            source
                .fetch_node(stub)
                .await
                .with_context(|| format!("fetch node {}/{}", stub.label, stub.id))
        })
        .buffered(limit)
        .try_collect()
        .await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use relgraph_core::{NodeId, NodePayload};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    pub(crate) struct MemorySource {
        pub stubs: Vec<NodeStub>,
        pub records: HashMap<NodeId, NodeRecord>,
        pub delay: Duration,
        in_flight: AtomicUsize,
        pub peak: AtomicUsize,
        pub calls: AtomicUsize,
    }

    impl MemorySource {
        pub fn with(records: Vec<NodeRecord>) -> Self {
            let stubs = records.iter().map(|r| r.node.stub()).collect();
            let records = records
                .into_iter()
                .map(|r| (r.node.id.clone(), r))
                .collect();
            Self {
                stubs,
                records,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl NodeSource for MemorySource {
        async fn list_nodes(&self) -> Result<Vec<NodeStub>> {
            Ok(self.stubs.clone())
        }

        async fn fetch_node(&self, stub: &NodeStub) -> Result<NodeRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.records
                .get(&stub.id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("404 for {}", stub.id))
        }
    }

    pub(crate) fn users(n: u64) -> Vec<NodeRecord> {
        (1..=n)
            .map(|i| {
                NodeRecord::new(NodePayload::new(i, "User"))
                    .related_to(NodePayload::new(1000u64, "Group"))
            })
            .collect()
    }

    #[tokio::test]
    async fn keeps_listing_order() {
        let src = MemorySource::with(users(5));
        let records = fetch_records(&src, 2).await.unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.node.id.as_str().to_string()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn never_exceeds_concurrency_cap() {
        let mut src = MemorySource::with(users(12));
        src.delay = Duration::from_millis(5);
        fetch_records(&src, 3).await.unwrap();
        assert_eq!(src.peak.load(Ordering::SeqCst), 3);
        assert_eq!(src.calls.load(Ordering::SeqCst), 12);
    }

    #[tokio::test]
    async fn zero_concurrency_still_fetches_serially() {
        let src = MemorySource::with(users(3));
        let records = fetch_records(&src, 0).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(src.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn one_failure_aborts_the_load() {
        let mut src = MemorySource::with(users(4));
        src.stubs.push(NodeStub::new(77u64, "User"));
        let err = fetch_records(&src, 2).await.unwrap_err();
        assert!(format!("{err:#}").contains("fetch node User/77"));
    }

    #[tokio::test]
    async fn listing_entries_without_id_are_not_fetched() {
        let mut src = MemorySource::with(users(2));
        src.stubs.push(NodeStub::new("", "User"));
        let records = fetch_records(&src, 4).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(src.calls.load(Ordering::SeqCst), 2);
    }
}
