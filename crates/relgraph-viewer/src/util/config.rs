use anyhow::Context;
use directories::ProjectDirs;
use relgraph_loader::LoaderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub node_radius: f32,
    pub camera_distance: f32,
    pub show_links: bool,
    pub pick_radius_px: f32,
    pub loader: LoaderConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            node_radius: 0.1,
            camera_distance: 10.0,
            show_links: true,
            pick_radius_px: 14.0,
            loader: LoaderConfig::default(),
        }
    }
}

fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "relgraph")?;
    Some(proj.config_dir().join("viewer.toml"))
}

pub fn load_or_default() -> ViewerConfig {
    let mut cfg = match config_file_path() {
        Some(path) => load_or_default_from_path(&path),
        None => ViewerConfig::default(),
    };
    apply_env_overrides(&mut cfg);
    cfg
}

fn apply_env_overrides(cfg: &mut ViewerConfig) {
    if let Some(url) = std::env::var("RELGRAPH_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
    {
        cfg.loader.base_url = url;
    }
}

fn load_or_default_from_path(path: &Path) -> ViewerConfig {
    let Ok(contents) = fs::read_to_string(path) else {
        return ViewerConfig::default();
    };
    toml::from_str(&contents).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), %err, "ignoring unreadable viewer config");
        ViewerConfig::default()
    })
}

pub fn save(cfg: &ViewerConfig) -> anyhow::Result<()> {
    let Some(path) = config_file_path() else {
        return Err(anyhow::anyhow!("no config directory available"));
    };
    save_to_path(cfg, &path)
}

fn save_to_path(cfg: &ViewerConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let data = toml::to_string_pretty(cfg).context("failed to serialize viewer config")?;
    fs::write(path, data)
        .with_context(|| format!("failed to write viewer config {}", path.display()))?;
    Ok(())
}
