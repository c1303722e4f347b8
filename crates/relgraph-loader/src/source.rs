use anyhow::{Context, Result};
use async_trait::async_trait;
use relgraph_core::{NodeRecord, NodeStub};
use url::Url;

/// Where node listings and per-node detail records come from.
#[async_trait]
pub trait NodeSource: Send + Sync {
    async fn list_nodes(&self) -> Result<Vec<NodeStub>>;
    async fn fetch_node(&self, stub: &NodeStub) -> Result<NodeRecord>;
}

/// The HTTP backend: `GET /nodes` and `GET /node/{label}/{id}`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("invalid base url {base_url:?}"))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("base url cannot carry a path: {base}");
        }
        Ok(Self { client, base })
    }

    pub fn nodes_url(&self) -> Result<Url> {
        self.endpoint(&["nodes"])
    }

    pub fn node_url(&self, stub: &NodeStub) -> Result<Url> {
        self.endpoint(&["node", stub.label.as_str(), stub.id.as_str()])
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("base url cannot carry a path: {}", self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url}"))?;
        resp.json::<T>()
            .await
            .with_context(|| format!("decode body of {url}"))
    }
}

#[async_trait]
impl NodeSource for HttpSource {
    async fn list_nodes(&self) -> Result<Vec<NodeStub>> {
        let url = self.nodes_url()?;
        let listing: serde_json::Value = self.get_json(url.clone()).await?;
        let serde_json::Value::Array(items) = listing else {
            anyhow::bail!("{url} did not return a JSON array");
        };
        Ok(items
            .into_iter()
            .filter(|v| v.is_object())
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect())
    }

    async fn fetch_node(&self, stub: &NodeStub) -> Result<NodeRecord> {
        let url = self.node_url(stub)?;
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint_urls() {
        let src = HttpSource::new("http://localhost:8000").unwrap();
        assert_eq!(src.nodes_url().unwrap().as_str(), "http://localhost:8000/nodes");
        let stub = NodeStub::new(42u64, "User");
        assert_eq!(
            src.node_url(&stub).unwrap().as_str(),
            "http://localhost:8000/node/User/42"
        );
    }

    #[test]
    fn keeps_base_path_and_escapes_segments() {
        let src = HttpSource::new("http://graph.local/api/").unwrap();
        let stub = NodeStub::new("a/b c", "Group");
        assert_eq!(
            src.node_url(&stub).unwrap().as_str(),
            "http://graph.local/api/node/Group/a%2Fb%20c"
        );
    }

    #[test]
    fn rejects_unusable_base() {
        assert!(HttpSource::new("not a url").is_err());
        assert!(HttpSource::new("mailto:someone@example.com").is_err());
    }
}
