use anyhow::{Context, Result};
use relgraph_core::{LayoutParams, LayoutUpdate, RelatedNodes};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Base URL of the node backend; `RELGRAPH_URL` wins over the built-in default.
pub fn default_base_url() -> String {
    std::env::var("RELGRAPH_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Everything one load attempt needs: where to fetch from, how wide to fan
/// out, and how to build and lay out the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub base_url: String,
    pub concurrency: usize,
    pub related_nodes: RelatedNodes,
    pub passes: usize,
    pub seed: Option<u64>,
    pub layout: LayoutParams,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            concurrency: DEFAULT_CONCURRENCY,
            related_nodes: RelatedNodes::default(),
            passes: 1,
            seed: None,
            layout: LayoutParams::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DumpConfig {
    pub loader: LoaderConfig,
    pub pretty: bool,
    pub out: Option<PathBuf>,
}

pub const USAGE: &str = "usage: relgraph-dump [--url URL] [--concurrency N] [--seed N] [--passes N] \
[--max-distance F] [--repulsion F] [--attraction F] [--simultaneous] [--primary-only] [--pretty] \
[--out PATH]";

pub fn parse_args() -> Result<DumpConfig> {
    parse_args_from(std::env::args_os().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<DumpConfig>
where
    I: IntoIterator<Item = OsString>,
{
    let mut loader = LoaderConfig::default();
    let mut pretty = false;
    let mut out = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let flag = arg.to_string_lossy().into_owned();
        match flag.as_str() {
            "--url" => loader.base_url = value(&mut args, &flag)?,
            "--concurrency" => loader.concurrency = parsed(&mut args, &flag)?,
            "--seed" => loader.seed = Some(parsed(&mut args, &flag)?),
            "--passes" => loader.passes = parsed(&mut args, &flag)?,
            "--max-distance" => loader.layout.max_distance = parsed(&mut args, &flag)?,
            "--repulsion" => loader.layout.repulsion_factor = parsed(&mut args, &flag)?,
            "--attraction" => loader.layout.attraction_factor = parsed(&mut args, &flag)?,
            "--simultaneous" => loader.layout.update = LayoutUpdate::Simultaneous,
            "--primary-only" => loader.related_nodes = RelatedNodes::PrimaryOnly,
            "--pretty" => pretty = true,
            "--out" => out = Some(PathBuf::from(value(&mut args, &flag)?)),
            "-h" | "--help" => anyhow::bail!("{USAGE}"),
            _ => anyhow::bail!("unknown argument: {:?}\n{USAGE}", arg),
        }
    }

    if loader.concurrency == 0 {
        anyhow::bail!("--concurrency must be at least 1");
    }
    if !(loader.layout.max_distance > 0.0) {
        anyhow::bail!("--max-distance must be positive");
    }

    Ok(DumpConfig {
        loader,
        pretty,
        out,
    })
}

fn value<I>(args: &mut I, flag: &str) -> Result<String>
where
    I: Iterator<Item = OsString>,
{
    let Some(v) = args.next() else {
        anyhow::bail!("{flag} expects a value");
    };
    Ok(v.to_string_lossy().into_owned())
}

fn parsed<T, I>(args: &mut I, flag: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    I: Iterator<Item = OsString>,
{
    let raw = value(args, flag)?;
    raw.parse()
        .with_context(|| format!("{flag}: invalid value {raw:?}"))
}
