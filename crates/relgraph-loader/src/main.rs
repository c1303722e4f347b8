use anyhow::{Context, Result};
use relgraph_core::SceneSnapshot;
use relgraph_loader::config::parse_args;
use relgraph_loader::{load_scene, HttpSource};
use std::io::Write;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = parse_args()?;

    tracing::info!(
        url = %config.loader.base_url,
        concurrency = config.loader.concurrency,
        seed = ?config.loader.seed,
        passes = config.loader.passes,
        "loading graph"
    );

    let source = HttpSource::new(&config.loader.base_url)?;
    let loaded = load_scene(&source, &config.loader)
        .await
        .with_context(|| format!("load graph from {}", config.loader.base_url))?;

    let snapshot = SceneSnapshot::from_graph(&loaded.graph);
    let data = if config.pretty {
        serde_json::to_vec_pretty(&snapshot)?
    } else {
        serde_json::to_vec(&snapshot)?
    };

    match &config.out {
        Some(path) => std::fs::write(path, &data)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
