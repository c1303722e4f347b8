//! Fetches node records from the backend and turns them into a laid-out
//! [`Graph`].

pub mod config;
pub mod fetch;
pub mod source;

use anyhow::Result;
use relgraph_core::{Graph, GraphBuilder, LayoutEngine, NodeRecord};
use std::time::{Duration, Instant};

pub use config::{DumpConfig, LoaderConfig};
pub use fetch::fetch_records;
pub use source::{HttpSource, NodeSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadStats {
    pub records: usize,
    pub nodes: usize,
    pub links: usize,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct Loaded {
    pub graph: Graph,
    pub stats: LoadStats,
}

/// Build and lay out a graph from already-fetched records.
pub fn build_scene(records: Vec<NodeRecord>, cfg: &LoaderConfig) -> Graph {
    let mut builder = GraphBuilder::with_policy(cfg.related_nodes);
    builder.extend(records);
    let mut graph = builder.finish();

    let mut engine = layout_engine(cfg);
    engine.run(&mut graph, cfg.passes);
    graph
}

pub fn layout_engine(cfg: &LoaderConfig) -> LayoutEngine {
    match cfg.seed {
        Some(seed) => LayoutEngine::seeded(cfg.layout, seed),
        None => LayoutEngine::new(cfg.layout),
    }
}

/// One full load attempt: fetch, build, layout.
pub async fn load_scene<S>(source: &S, cfg: &LoaderConfig) -> Result<Loaded>
where
    S: NodeSource + ?Sized,
{
    let started = Instant::now();
    let records = fetch_records(source, cfg.concurrency).await?;
    let record_count = records.len();

    let graph = build_scene(records, cfg);
    let stats = LoadStats {
        records: record_count,
        nodes: graph.len(),
        links: graph.links().len(),
        elapsed: started.elapsed(),
    };
    tracing::info!(
        records = stats.records,
        nodes = stats.nodes,
        links = stats.links,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "graph loaded"
    );
    Ok(Loaded { graph, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::{users, MemorySource};
    use relgraph_core::{NodeId, NodePayload, RelatedNodes, SceneSnapshot};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn seeded() -> LoaderConfig {
        LoaderConfig {
            seed: Some(9),
            ..LoaderConfig::default()
        }
    }

    #[tokio::test]
    async fn loads_users_around_shared_group() {
        let src = MemorySource::with(users(4));
        let loaded = load_scene(&src, &seeded()).await.unwrap();

        assert_eq!(loaded.stats.records, 4);
        assert_eq!(loaded.graph.len(), 5);
        assert_eq!(loaded.graph.links().len(), 4);
        assert!(loaded.graph.node(&NodeId::from(1000)).unwrap().stub);
        for n in loaded.graph.nodes() {
            assert!(n.position.is_finite());
        }
    }

    #[tokio::test]
    async fn seeded_loads_are_reproducible() {
        let src = MemorySource::with(users(6));
        let a = load_scene(&src, &seeded()).await.unwrap();
        let b = load_scene(&src, &seeded()).await.unwrap();
        assert_eq!(
            SceneSnapshot::from_graph(&a.graph),
            SceneSnapshot::from_graph(&b.graph)
        );
    }

    #[tokio::test]
    async fn dangling_relation_under_primary_only() {
        let records = vec![NodeRecord::new(NodePayload::new(1u64, "User"))
            .related_to(NodePayload::new(99u64, "Group"))];
        let src = MemorySource::with(records);
        let cfg = LoaderConfig {
            related_nodes: RelatedNodes::PrimaryOnly,
            ..seeded()
        };
        let loaded = load_scene(&src, &cfg).await.unwrap();
        assert_eq!(loaded.graph.len(), 1);
        assert!(!loaded.graph.contains(&NodeId::from(99)));
        assert!(loaded.graph.links().is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_yields_no_graph() {
        let mut src = MemorySource::with(users(2));
        src.stubs.push(relgraph_core::NodeStub::new(5u64, "User"));
        assert!(load_scene(&src, &seeded()).await.is_err());
    }

    fn local_source(base: &str) -> HttpSource {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpSource::with_client(client, base).unwrap()
    }

    async fn serve(listener: TcpListener, routes: Vec<(&'static str, &'static str)>) {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                return;
            };
            let mut buf = vec![0u8; 4096];
            let mut read = 0;
            while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                match sock.read(&mut buf[read..]).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => read += n,
                }
            }
            let head = String::from_utf8_lossy(&buf[..read]).to_string();
            let path = head.split_whitespace().nth(1).unwrap_or("").to_string();
            let (status, body) = routes
                .iter()
                .find(|(p, _)| *p == path)
                .map(|(_, b)| ("200 OK", *b))
                .unwrap_or(("404 Not Found", ""));
            let resp = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = sock.write_all(resp.as_bytes()).await;
            let _ = sock.shutdown().await;
        }
    }

    #[tokio::test]
    async fn http_source_end_to_end() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(serve(
            listener,
            vec![
                ("/nodes", r#"[{"id": 1, "label": "User"}, {"id": 2, "label": "Group"}]"#),
                (
                    "/node/User/1",
                    r#"{"node": {"id": 1, "label": "User", "attributes": {"name": "Ann"}},
                        "relations": [{"related_node": {"id": 2, "label": "Group"}}]}"#,
                ),
                (
                    "/node/Group/2",
                    r#"{"node": {"id": 2, "label": "Group"}, "relations": []}"#,
                ),
            ],
        ));

        let src = local_source(&base);
        let cfg = LoaderConfig {
            base_url: base.clone(),
            ..seeded()
        };
        let loaded = load_scene(&src, &cfg).await.unwrap();
        assert_eq!(loaded.graph.len(), 2);
        assert_eq!(loaded.graph.links().len(), 1);
        assert_eq!(
            loaded.graph.node(&NodeId::from(1)).unwrap().attributes["name"],
            "Ann"
        );
    }

    #[tokio::test]
    async fn http_error_status_aborts_load() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(serve(
            listener,
            vec![("/nodes", r#"[{"id": 1, "label": "User"}]"#)],
        ));

        let src = local_source(&base);
        let err = load_scene(&src, &seeded()).await.unwrap_err();
        assert!(format!("{err:#}").contains("fetch node User/1"));
    }
}
